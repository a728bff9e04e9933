use std::env;
use std::sync::Arc;

use dotenvy::dotenv;
use rand::thread_rng;
use serenity::{
    async_trait,
    client::{Client, Context, EventHandler},
    framework::{
        standard::{
            macros::{command, group, hook},
            Args, CommandError, CommandResult,
        },
        StandardFramework,
    },
    model::{channel::Message, gateway::Ready},
    prelude::{GatewayIntents, TypeMap},
    Result as SerenityResult,
};
use serenity::model::guild::{Guild, Member};
use serenity::model::id::{ChannelId, GuildId, UserId};
use serenity::model::mention::Mentionable;
use serenity::model::prelude::VoiceState;
use serenity::utils::{parse_username, Colour};
use songbird::error::JoinError;
use songbird::input::ytdl_search;
use songbird::tracks::{PlayMode, TrackHandle};
use songbird::{
    ytdl, Event, EventContext, EventHandler as VoiceEventHandler, SerenityInit, Songbird,
    TrackEvent,
};
use tokio::sync::RwLockWriteGuard;
use tracing::{error, info};

use crate::models::{GuildPlayers, Track};
use crate::util::{flip_coin, format_duration, missing_arg, pick_choice, MSG_MEMBER_NOT_FOUND};

mod models;
mod util;

struct Handler;

pub struct PlayerStore;

impl serenity::prelude::TypeMapKey for PlayerStore {
    type Value = GuildPlayers;
}

pub struct BotUser;

impl serenity::prelude::TypeMapKey for BotUser {
    type Value = UserId;
}

const UNKNOWN_TRACK_TITLE: &str = "UNKNOWN TRACK";

// Result, error and notice embed colours.
const COLOUR_OK: Colour = Colour(0x2ECC71);
const COLOUR_ERROR: Colour = Colour(0xE74C3C);
const COLOUR_NOTICE: Colour = Colour(0x3498DB);

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        let data = &mut ctx.data.write().await;
        data.insert::<BotUser>(ready.user.id);
    }

    async fn voice_state_update(&self, ctx: Context, _: Option<VoiceState>, new: VoiceState) {
        // Only bot disconnects matter here; they orphan the guild player.
        if new.channel_id.is_some() {
            return;
        }

        let bot_id = {
            let data = ctx.data.read().await;
            data.get::<BotUser>().copied()
        };

        if let (Some(bot_id), Some(guild_id)) = (bot_id, new.guild_id) {
            if bot_id == new.user_id {
                info!("Disconnected from voice in guild {}, dropping player", guild_id.0);
                drop_player(&ctx, &guild_id).await;
            }
        }
    }
}

#[group]
#[commands(
    ping, joined, coinflip, choose, cool, join, leave, play, pause, resume, skip, remove, clear,
    queue, np
)]
struct General;

#[hook]
async fn after(_ctx: &Context, _msg: &Message, command_name: &str, command_result: CommandResult) {
    if let Err(why) = command_result {
        error!("Command '{command_name}' returned error: {why:?}");
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt::init();

    // Configure the client with your Discord bot token in the environment.
    let token = env::var("DISCORDBOT_TOKEN")
        .expect("Expected DISCORDBOT_TOKEN in the environment - cannot start without a bot token");

    let framework = StandardFramework::new()
        .configure(|c| {
            c.prefix("~")
        })
        .after(after)
        .group(&GENERAL_GROUP);

    let intents = GatewayIntents::non_privileged()
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS;

    let mut client = Client::builder(&token, intents)
        .event_handler(Handler)
        .framework(framework)
        .register_songbird()
        .await
        .expect("Err creating client");

    {
        let mut w = client.data.write().await;

        w.insert::<PlayerStore>(GuildPlayers::default());
    }

    tokio::spawn(async move {
        let _ = client.start().await.map_err(|why| info!("Client ended: {why:?}"));
    });

    tokio::signal::ctrl_c().await.expect("Control-C interruption failed!");

    info!("Received Ctrl-C, shutting down.");
}

#[command]
async fn ping(ctx: &Context, msg: &Message) -> CommandResult {
    send_embed(ctx, msg.channel_id, COLOUR_OK, "Pong!").await;

    Ok(())
}

#[command]
#[only_in(guilds)]
async fn joined(ctx: &Context, msg: &Message, mut args: Args) -> CommandResult {
    if args.is_empty() {
        send_embed(ctx, msg.channel_id, COLOUR_ERROR, &missing_arg("Guild Member")).await;
        return Ok(());
    }

    let query = args.single::<String>()?;
    let guild = get_guild(ctx, msg)?;

    let member = match resolve_member(ctx, &guild, &query).await {
        Some(member) => member,
        None => {
            send_embed(ctx, msg.channel_id, COLOUR_ERROR, MSG_MEMBER_NOT_FOUND).await;
            return Ok(());
        }
    };

    let text = match member.joined_at {
        Some(at) => format!("{} joined <t:{}:f>", member.user.name, at.unix_timestamp()),
        None => format!("{} joined at an unknown time", member.user.name),
    };
    send_embed(ctx, msg.channel_id, COLOUR_OK, &text).await;

    Ok(())
}

/// Accepts a mention, a raw user id or a member name.
async fn resolve_member(ctx: &Context, guild: &Guild, query: &str) -> Option<Member> {
    let user_id = parse_username(query)
        .or_else(|| query.parse::<u64>().ok())
        .map(UserId);

    if let Some(user_id) = user_id {
        return guild.member(ctx, user_id).await.ok();
    }

    guild.member_named(query).cloned()
}

#[command]
async fn coinflip(ctx: &Context, msg: &Message) -> CommandResult {
    let face = flip_coin(&mut thread_rng());
    send_embed(ctx, msg.channel_id, COLOUR_OK, face).await;

    Ok(())
}

#[command]
async fn choose(ctx: &Context, msg: &Message, args: Args) -> CommandResult {
    let choices: Vec<&str> = args.raw().collect();

    let picked = pick_choice(&mut thread_rng(), &choices);
    match picked {
        Some(choice) => send_embed(ctx, msg.channel_id, COLOUR_OK, choice).await,
        None => {
            send_embed(ctx, msg.channel_id, COLOUR_ERROR, &missing_arg("Choices(string)")).await
        }
    }

    Ok(())
}

#[command]
async fn cool(ctx: &Context, msg: &Message, args: Args) -> CommandResult {
    let subject = args.message().trim();

    let reply = if subject == "bot" {
        "Yes, the bot is cool.".to_string()
    } else {
        format!("No, {subject} is not cool")
    };

    check_msg(msg.channel_id.say(&ctx.http, reply).await);

    Ok(())
}

#[command]
#[only_in(guilds)]
async fn join(ctx: &Context, msg: &Message) -> CommandResult {
    join_voice(ctx, msg).await
}

async fn join_voice(ctx: &Context, msg: &Message) -> CommandResult {
    let guild = get_guild(ctx, msg)?;
    let guild_id = guild.id;

    let connect_to = match guild
        .voice_states
        .get(&msg.author.id)
        .and_then(|voice_state| voice_state.channel_id)
    {
        Some(channel) => channel,
        None => {
            send_embed(
                ctx,
                msg.channel_id,
                COLOUR_ERROR,
                "Error: User must be in a voice channel",
            )
            .await;

            return Err(CommandError::from("No channel to join"));
        }
    };

    let manager = songbird_manager(ctx).await;

    if let Some(handler_lock) = manager.get(guild_id) {
        let already_there = {
            let handler = handler_lock.lock().await;
            handler.current_channel() == Some(connect_to.into())
        };

        if already_there {
            send_embed(
                ctx,
                msg.channel_id,
                COLOUR_NOTICE,
                "Notice: Bot already connected to channel",
            )
            .await;

            return Ok(());
        }
    }

    let channel_name = connect_to
        .name(&ctx.cache)
        .await
        .unwrap_or_else(|| connect_to.0.to_string());

    // Joining an already-connected guild moves the bot between channels.
    let (_handler, join_result) = manager.join(guild_id, connect_to).await;

    if let Err(why) = join_result {
        let text = match why {
            JoinError::TimedOut => {
                format!("Error: Connecting to channel `{channel_name}` timed out")
            }
            other => format!("Error: Could not connect to channel `{channel_name}` - {other}"),
        };
        send_embed(ctx, msg.channel_id, COLOUR_ERROR, &text).await;

        return Err(CommandError::from("Voice connection failed"));
    }

    deafen(ctx, guild_id).await;

    send_embed(
        ctx,
        msg.channel_id,
        COLOUR_NOTICE,
        &format!("Notice: Joining Channel - `{channel_name}`"),
    )
    .await;

    Ok(())
}

async fn deafen(ctx: &Context, guild_id: GuildId) {
    let manager = songbird_manager(ctx).await;

    let handler_lock = match manager.get(guild_id) {
        Some(handler) => handler,
        None => return,
    };

    let mut handler = handler_lock.lock().await;

    if handler.is_deaf() {
        info!("Already deafen!")
    } else if let Err(e) = handler.deafen(true).await {
        info!("Deafen failed due to {e:?}")
    }
}

#[command]
#[only_in(guilds)]
async fn leave(ctx: &Context, msg: &Message) -> CommandResult {
    let guild_id = get_guild_id(ctx, msg)?;
    let manager = songbird_manager(ctx).await;

    if manager.get(guild_id).is_none() {
        send_embed(
            ctx,
            msg.channel_id,
            COLOUR_ERROR,
            "Error: Currently not connected to a voice channel",
        )
        .await;

        return Ok(());
    }

    drop_player(ctx, &guild_id).await;

    if let Err(e) = manager.remove(guild_id).await {
        check_msg(msg.channel_id.say(&ctx.http, format!("Failed: {e:?}")).await);

        return Ok(());
    }

    check_msg(msg.channel_id.say(&ctx.http, "Disconnected from voice channel").await);

    Ok(())
}

#[command]
#[aliases("p")]
#[only_in(guilds)]
async fn play(ctx: &Context, msg: &Message, args: Args) -> CommandResult {
    if args.is_empty() {
        send_embed(
            ctx,
            msg.channel_id,
            COLOUR_ERROR,
            &missing_arg("Search Parameters(string | url)"),
        )
        .await;

        return Ok(());
    }

    let guild_id = get_guild_id(ctx, msg)?;
    let manager = songbird_manager(ctx).await;

    if manager.get(guild_id).is_none() {
        join_voice(ctx, msg).await?;
    }

    let user_input = args.message();

    info!("PLAY - Resolving user input {user_input}");

    let input = if user_input.starts_with("http") {
        ytdl(user_input).await
    } else {
        ytdl_search(user_input).await
    };

    let input = match input {
        Ok(input) => input,
        Err(why) => {
            info!("Resolving {user_input} failed: {why:?}");
            send_embed(
                ctx,
                msg.channel_id,
                COLOUR_ERROR,
                &format!("Error: Could not load song for input `{user_input}`"),
            )
            .await;

            return Ok(());
        }
    };

    let url = match input.metadata.source_url.clone() {
        Some(url) => url,
        None => {
            send_embed(
                ctx,
                msg.channel_id,
                COLOUR_ERROR,
                &format!("Error: Could not load song for input `{user_input}`"),
            )
            .await;

            return Ok(());
        }
    };

    let track = Track {
        title: input
            .metadata
            .title
            .clone()
            .unwrap_or_else(|| UNKNOWN_TRACK_TITLE.to_string()),
        url,
        duration: input.metadata.duration,
        requested_by: msg.author.id,
        requested_by_name: msg.author.name.clone(),
    };

    enqueue_track(ctx, &guild_id, track.clone()).await;

    send_embed(
        ctx,
        msg.channel_id,
        COLOUR_NOTICE,
        &format!("Notice: Added [{}]({}) to the queue", track.title, track.url),
    )
    .await;

    play_next_if_idle(ctx, &guild_id, &msg.channel_id).await;

    Ok(())
}

#[command]
#[only_in(guilds)]
async fn pause(ctx: &Context, msg: &Message) -> CommandResult {
    let guild_id = get_guild_id(ctx, msg)?;

    let track_handle = match current_track_handle(ctx, &guild_id).await {
        Some(track_handle) => track_handle,
        None => {
            send_embed(
                ctx,
                msg.channel_id,
                COLOUR_NOTICE,
                "Notice: Not currently playing anything",
            )
            .await;

            return Ok(());
        }
    };

    if track_mode(&track_handle).await? == PlayMode::Pause {
        return Ok(());
    }

    track_handle.pause()?;
    send_embed(ctx, msg.channel_id, COLOUR_NOTICE, "Notice: Paused Playback").await;

    Ok(())
}

#[command]
#[only_in(guilds)]
async fn resume(ctx: &Context, msg: &Message) -> CommandResult {
    let guild_id = get_guild_id(ctx, msg)?;
    let manager = songbird_manager(ctx).await;

    if manager.get(guild_id).is_none() {
        send_embed(
            ctx,
            msg.channel_id,
            COLOUR_NOTICE,
            "Notice: Not currently connected to a voice channel",
        )
        .await;

        return Ok(());
    }

    let track_handle = match current_track_handle(ctx, &guild_id).await {
        Some(track_handle) => track_handle,
        None => return Ok(()),
    };

    if track_mode(&track_handle).await? != PlayMode::Pause {
        return Ok(());
    }

    track_handle.play()?;
    send_embed(ctx, msg.channel_id, COLOUR_NOTICE, "Notice: Resumed Playback").await;

    Ok(())
}

#[command]
#[only_in(guilds)]
async fn skip(ctx: &Context, msg: &Message) -> CommandResult {
    let guild_id = get_guild_id(ctx, msg)?;
    let manager = songbird_manager(ctx).await;

    if manager.get(guild_id).is_none() {
        send_embed(
            ctx,
            msg.channel_id,
            COLOUR_NOTICE,
            "Notice: Not currently connected to a voice channel",
        )
        .await;

        return Ok(());
    }

    match current_track_handle(ctx, &guild_id).await {
        // Stopping the current track fires the end notifier, which starts the
        // next queued one.
        Some(track_handle) => track_handle.stop()?,
        None => {}
    }

    Ok(())
}

#[command]
#[aliases("rm")]
#[only_in(guilds)]
async fn remove(ctx: &Context, msg: &Message, mut args: Args) -> CommandResult {
    let guild_id = get_guild_id(ctx, msg)?;
    let manager = songbird_manager(ctx).await;

    if manager.get(guild_id).is_none() {
        send_embed(
            ctx,
            msg.channel_id,
            COLOUR_NOTICE,
            "Notice: Not currently connected to a voice channel",
        )
        .await;

        return Ok(());
    }

    let position = if args.is_empty() {
        None
    } else {
        match args.single::<usize>() {
            Ok(position) => Some(position),
            Err(_) => {
                send_embed(ctx, msg.channel_id, COLOUR_ERROR, "Error: Disallowed input type")
                    .await;

                return Ok(());
            }
        }
    };

    let removed = {
        let data = &mut ctx.data.write().await;
        let players = get_players_mut(data)?;

        match players.get_mut(guild_id.0) {
            Some(player) => match position {
                Some(position) => player.remove_at(position),
                None => player.remove_last(),
            },
            None => None,
        }
    };

    match (removed, position) {
        (Some(track), _) => {
            send_embed(
                ctx,
                msg.channel_id,
                COLOUR_NOTICE,
                &format!(
                    "Removed [{}]({}) [{}]",
                    track.title,
                    track.url,
                    track.requested_by.mention()
                ),
            )
            .await;
        }
        (None, Some(position)) => {
            send_embed(
                ctx,
                msg.channel_id,
                COLOUR_ERROR,
                &format!("Error: Could not find song at position `{position}`"),
            )
            .await;
        }
        (None, None) => {
            send_embed(ctx, msg.channel_id, COLOUR_NOTICE, "Notice: Queue is empty").await;
        }
    }

    Ok(())
}

#[command]
#[aliases("cl", "clr", "cr")]
#[only_in(guilds)]
async fn clear(ctx: &Context, msg: &Message) -> CommandResult {
    let guild_id = get_guild_id(ctx, msg)?;
    let manager = songbird_manager(ctx).await;

    if manager.get(guild_id).is_none() {
        send_embed(
            ctx,
            msg.channel_id,
            COLOUR_NOTICE,
            "Notice: Not currently connected to a voice channel",
        )
        .await;

        return Ok(());
    }

    {
        let data = &mut ctx.data.write().await;
        let players = get_players_mut(data)?;

        if let Some(player) = players.get_mut(guild_id.0) {
            player.clear();
        }
    }

    send_embed(ctx, msg.channel_id, COLOUR_NOTICE, "Notice: Queue has been cleared").await;

    Ok(())
}

#[command]
#[aliases("q")]
#[only_in(guilds)]
async fn queue(ctx: &Context, msg: &Message) -> CommandResult {
    let guild = get_guild(ctx, msg)?;
    let guild_id = guild.id;
    let manager = songbird_manager(ctx).await;

    if manager.get(guild_id).is_none() {
        send_embed(
            ctx,
            msg.channel_id,
            COLOUR_NOTICE,
            "Notice: Not currently connected to a voice channel",
        )
        .await;

        return Ok(());
    }

    let (current, upcoming) = {
        let data = ctx.data.read().await;

        match data.get::<PlayerStore>().and_then(|players| players.get(guild_id.0)) {
            Some(player) => (
                player.current.clone(),
                player.queue.iter().cloned().collect::<Vec<Track>>(),
            ),
            None => (None, Vec::new()),
        }
    };

    if current.is_none() && upcoming.is_empty() {
        send_embed(ctx, msg.channel_id, COLOUR_NOTICE, "Notice: Queue is empty").await;

        return Ok(());
    }

    let mut description = String::new();

    if let Some(track) = &current {
        description.push_str(&format!(
            "__Now Playing__:\n[{}]({}) | ` {} Requested by: {}`\n\n",
            track.title,
            track.url,
            format_duration(track.duration),
            track.requested_by_name,
        ));
    }

    description.push_str("__Up Next:__\n");

    for (index, track) in upcoming.iter().enumerate() {
        description.push_str(&format!(
            "`{}.` [{}]({}) | ` {} Requested by: {}`\n",
            index + 1,
            track.title,
            track.url,
            format_duration(track.duration),
            track.requested_by_name,
        ));
    }

    description.push_str(&format!("\n**{} songs in queue**", upcoming.len()));

    let result = msg
        .channel_id
        .send_message(&ctx.http, |m| {
            m.embed(|e| {
                e.title(format!("Queue for {}", guild.name))
                    .description(description)
                    .colour(COLOUR_NOTICE)
                    .footer(|f| f.text(&msg.author.name).icon_url(msg.author.face()))
            })
        })
        .await;

    check_msg(result);

    Ok(())
}

#[command]
#[aliases("current", "song", "currentsong", "playing")]
#[only_in(guilds)]
async fn np(ctx: &Context, msg: &Message) -> CommandResult {
    let guild_id = get_guild_id(ctx, msg)?;
    let manager = songbird_manager(ctx).await;

    if manager.get(guild_id).is_none() {
        send_embed(
            ctx,
            msg.channel_id,
            COLOUR_NOTICE,
            "Notice: Not currently connected to a voice channel",
        )
        .await;

        return Ok(());
    }

    let current = {
        let data = ctx.data.read().await;

        data.get::<PlayerStore>()
            .and_then(|players| players.get(guild_id.0))
            .and_then(|player| player.current.clone())
    };

    let track = match current {
        Some(track) => track,
        None => {
            send_embed(
                ctx,
                msg.channel_id,
                COLOUR_NOTICE,
                "Notice: Currently not playing anything",
            )
            .await;

            return Ok(());
        }
    };

    let bot_face = ctx.cache.current_user().face();

    let result = msg
        .channel_id
        .send_message(&ctx.http, |m| {
            m.embed(|e| {
                e.description(format!(
                    "[{}]({}) [{}] | `{}`",
                    track.title,
                    track.url,
                    track.requested_by.mention(),
                    format_duration(track.duration),
                ))
                .colour(COLOUR_OK)
                .author(|a| a.name("Now Playing 🎶").icon_url(bot_face))
            })
        })
        .await;

    check_msg(result);

    Ok(())
}

/// Starts playback when tracks are queued but nothing is streaming.
async fn play_next_if_idle(ctx: &Context, guild_id: &GuildId, channel_id: &ChannelId) {
    let (is_idle, queue_is_empty) = {
        let data = ctx.data.read().await;

        match data.get::<PlayerStore>().and_then(|players| players.get(guild_id.0)) {
            Some(player) => (player.track_handle.is_none(), player.queue.is_empty()),
            None => (false, true),
        }
    };

    if is_idle && !queue_is_empty {
        while play_next_track(ctx, guild_id, channel_id).await.is_err() {
            info!("Next track failed, trying the following one");
        }
    }
}

/// Pops the next queued track and streams it. `Ok` when the queue is drained,
/// `Err` when the popped track could not be resolved or started.
async fn play_next_track(
    ctx: &Context,
    guild_id: &GuildId,
    channel_id: &ChannelId,
) -> CommandResult {
    let track = match take_next_track(ctx, guild_id).await {
        Some(track) => track,
        None => return Ok(()),
    };

    info!("PLAY_NEXT - Next track is {} - {}", track.title, track.url);

    let manager = songbird_manager(ctx).await;

    let handler_lock = match manager.get(*guild_id) {
        Some(handler) => handler,
        None => {
            check_msg(channel_id.say(&ctx.http, "Not in a voice channel to play in").await);

            return Ok(());
        }
    };

    let source = match ytdl(&track.url).await {
        Ok(source) => source,
        Err(why) => {
            send_embed(
                ctx,
                *channel_id,
                COLOUR_ERROR,
                &format!("Error: Could not play {} - {}", track.title, why),
            )
            .await;

            info!("Err starting source: {why:?}");

            return Err(CommandError::from(format!("{why:?}")));
        }
    };

    let track_handle = {
        let mut handler = handler_lock.lock().await;
        handler.stop(); // Just in case something was playing before
        handler.play_source(source)
    };

    track_handle.add_event(
        Event::Track(TrackEvent::End),
        TrackEndNotifier {
            guild_id: *guild_id,
            channel_id: *channel_id,
            ctx: ctx.clone(),
        },
    )?;

    let announcement = format!(
        "Now playing [{}]({}) [{}]",
        track.title,
        track.url,
        track.requested_by.mention()
    );

    begin_track(ctx, guild_id, track, track_handle).await?;

    send_embed(ctx, *channel_id, COLOUR_OK, &announcement).await;

    Ok(())
}

struct TrackEndNotifier {
    guild_id: GuildId,
    channel_id: ChannelId,
    ctx: Context,
}

#[async_trait]
impl VoiceEventHandler for TrackEndNotifier {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<Event> {
        info!("Track ended in guild {}", self.guild_id.0);

        finish_track(&self.ctx, &self.guild_id).await;

        // If playing the next track fails, try the following one until the
        // queue drains.
        while play_next_track(&self.ctx, &self.guild_id, &self.channel_id)
            .await
            .is_err()
        {
            info!("Next track failed, trying the following one");
        }

        None
    }
}

async fn enqueue_track(ctx: &Context, guild_id: &GuildId, track: Track) {
    let data = &mut ctx.data.write().await;

    if let Ok(players) = get_players_mut(data) {
        players.get_or_create(guild_id.0).enqueue(track);
    }
}

async fn take_next_track(ctx: &Context, guild_id: &GuildId) -> Option<Track> {
    let data = &mut ctx.data.write().await;
    let players = get_players_mut(data).ok()?;
    let track = players.get_mut(guild_id.0)?.pop_next();

    match &track {
        None => info!("TAKE_NEXT - Queue is empty"),
        Some(track) => info!("TAKE_NEXT - Next track is {} - {}", track.title, track.url),
    };

    track
}

async fn begin_track(
    ctx: &Context,
    guild_id: &GuildId,
    track: Track,
    track_handle: TrackHandle,
) -> Result<(), CommandError> {
    let data = &mut ctx.data.write().await;
    let players = get_players_mut(data)?;

    players.get_or_create(guild_id.0).begin(track, track_handle);

    Ok(())
}

async fn finish_track(ctx: &Context, guild_id: &GuildId) {
    let data = &mut ctx.data.write().await;

    if let Ok(players) = get_players_mut(data) {
        if let Some(player) = players.get_mut(guild_id.0) {
            player.finish();
        }
    }
}

/// Forgets a guild's player, stopping whatever it was streaming.
async fn drop_player(ctx: &Context, guild_id: &GuildId) {
    let data = &mut ctx.data.write().await;

    let players = match get_players_mut(data) {
        Ok(players) => players,
        Err(_) => return,
    };

    if let Some(player) = players.drop_player(guild_id.0) {
        if let Some(track_handle) = player.track_handle {
            if let Err(why) = track_handle.stop() {
                info!("Stopping track on player drop failed: {why:?}");
            }
        }
    }
}

async fn current_track_handle(ctx: &Context, guild_id: &GuildId) -> Option<TrackHandle> {
    let data = ctx.data.read().await;

    data.get::<PlayerStore>()
        .and_then(|players| players.get(guild_id.0))
        .and_then(|player| player.track_handle.clone())
}

async fn track_mode(track_handle: &TrackHandle) -> Result<PlayMode, CommandError> {
    let info = track_handle.get_info().await?;

    Ok(info.playing)
}

fn get_players_mut<'a>(
    data: &'a mut RwLockWriteGuard<TypeMap>,
) -> Result<&'a mut GuildPlayers, CommandError> {
    data.get_mut::<PlayerStore>()
        .ok_or_else(|| CommandError::from("Player store not found"))
}

async fn songbird_manager(ctx: &Context) -> Arc<Songbird> {
    songbird::get(ctx)
        .await
        .expect("Songbird Voice client placed in at initialisation.")
        .clone()
}

async fn send_embed(ctx: &Context, channel_id: ChannelId, colour: Colour, text: &str) {
    let result = channel_id
        .send_message(&ctx.http, |m| {
            m.embed(|e| e.description(text).colour(colour))
        })
        .await;

    check_msg(result);
}

/// Checks that a message successfully sent; if not, then logs why to stdout.
fn check_msg(result: SerenityResult<Message>) {
    if let Err(why) = result {
        info!("Error sending message: {why:?}");
    }
}

fn get_guild(ctx: &Context, msg: &Message) -> CommandResult<Guild> {
    msg.guild(&ctx.cache).ok_or(CommandError::from("Guild not found"))
}

fn get_guild_id(ctx: &Context, msg: &Message) -> CommandResult<GuildId> {
    let guild_id = get_guild(ctx, msg)?.id;

    Ok(guild_id)
}
