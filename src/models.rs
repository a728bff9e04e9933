use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use serenity::model::id::UserId;
use songbird::tracks::TrackHandle;

/// Metadata for one resolved audio item. Immutable once created.
#[derive(Clone)]
pub struct Track {
    pub title: String,
    pub url: String,
    pub duration: Option<Duration>,
    pub requested_by: UserId,
    pub requested_by_name: String,
}

/// Playback state for one guild: the pending queue plus the track streaming now.
#[derive(Default)]
pub struct Player {
    pub queue: VecDeque<Track>,
    pub current: Option<Track>,
    pub track_handle: Option<TrackHandle>,
}

impl Player {
    pub fn enqueue(&mut self, track: Track) {
        self.queue.push_back(track);
    }

    pub fn pop_next(&mut self) -> Option<Track> {
        self.queue.pop_front()
    }

    /// Marks a track as streaming and keeps its live handle for pause/skip.
    pub fn begin(&mut self, track: Track, handle: TrackHandle) {
        self.current = Some(track);
        self.track_handle = Some(handle);
    }

    pub fn finish(&mut self) {
        self.current = None;
        self.track_handle = None;
    }

    /// Removes the track at a 1-based queue position.
    pub fn remove_at(&mut self, position: usize) -> Option<Track> {
        if position >= 1 && position <= self.queue.len() {
            self.queue.remove(position - 1)
        } else {
            None
        }
    }

    pub fn remove_last(&mut self) -> Option<Track> {
        self.queue.pop_back()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// All per-guild players, keyed by guild id. Lives in the client data map.
#[derive(Default)]
pub struct GuildPlayers {
    players: HashMap<u64, Player>,
}

impl GuildPlayers {
    pub fn get(&self, guild_id: u64) -> Option<&Player> {
        self.players.get(&guild_id)
    }

    pub fn get_mut(&mut self, guild_id: u64) -> Option<&mut Player> {
        self.players.get_mut(&guild_id)
    }

    pub fn get_or_create(&mut self, guild_id: u64) -> &mut Player {
        self.players.entry(guild_id).or_default()
    }

    pub fn drop_player(&mut self, guild_id: u64) -> Option<Player> {
        self.players.remove(&guild_id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn track(title: &str) -> Track {
        Track {
            title: title.to_string(),
            url: format!("https://example.com/{title}"),
            duration: Some(Duration::from_secs(180)),
            requested_by: UserId(1),
            requested_by_name: "tester".to_string(),
        }
    }

    #[test]
    fn players_are_created_lazily() {
        let mut players = GuildPlayers::default();
        assert!(players.get(7).is_none());

        players.get_or_create(7).enqueue(track("a"));
        assert_eq!(players.get(7).map(|p| p.queue.len()), Some(1));
    }

    #[test]
    fn queue_is_first_in_first_out() {
        let mut player = Player::default();
        player.enqueue(track("a"));
        player.enqueue(track("b"));
        player.enqueue(track("c"));

        assert_eq!(player.pop_next().map(|t| t.title), Some("a".to_string()));
        assert_eq!(player.pop_next().map(|t| t.title), Some("b".to_string()));
        assert_eq!(player.pop_next().map(|t| t.title), Some("c".to_string()));
        assert_eq!(player.pop_next().map(|t| t.title), None);
    }

    #[test]
    fn remove_uses_one_based_positions() {
        let mut player = Player::default();
        player.enqueue(track("a"));
        player.enqueue(track("b"));
        player.enqueue(track("c"));

        assert_eq!(player.remove_at(2).map(|t| t.title), Some("b".to_string()));
        assert_eq!(player.queue.len(), 2);
        assert_eq!(player.queue[0].title, "a");
        assert_eq!(player.queue[1].title, "c");
    }

    #[test]
    fn remove_rejects_out_of_range_positions() {
        let mut player = Player::default();
        player.enqueue(track("a"));

        assert!(player.remove_at(0).is_none());
        assert!(player.remove_at(2).is_none());
        assert_eq!(player.queue.len(), 1);
    }

    #[test]
    fn remove_without_position_drops_the_last_track() {
        let mut player = Player::default();
        player.enqueue(track("a"));
        player.enqueue(track("b"));

        assert_eq!(player.remove_last().map(|t| t.title), Some("b".to_string()));
        assert_eq!(player.queue.len(), 1);

        player.clear();
        assert!(player.remove_last().is_none());
    }

    #[test]
    fn clear_empties_the_pending_queue() {
        let mut player = Player::default();
        player.enqueue(track("a"));
        player.enqueue(track("b"));

        player.clear();
        assert!(player.queue.is_empty());
    }

    #[test]
    fn dropping_a_player_forgets_its_queue() {
        let mut players = GuildPlayers::default();
        players.get_or_create(7).enqueue(track("a"));

        assert!(players.drop_player(7).is_some());
        assert!(players.get(7).is_none());
        assert!(players.drop_player(7).is_none());
    }
}
