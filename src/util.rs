use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

pub const MSG_MEMBER_NOT_FOUND: &str = "Error: Guild Member not found!";

pub fn missing_arg(argument: &str) -> String {
    format!("Command is missing argument(s) - {argument}")
}

pub fn flip_coin<R: Rng>(rng: &mut R) -> &'static str {
    if rng.gen_bool(0.5) {
        "Heads"
    } else {
        "Tails"
    }
}

pub fn pick_choice<'a, R: Rng>(rng: &mut R, choices: &[&'a str]) -> Option<&'a str> {
    choices.choose(rng).copied()
}

/// Renders a track duration as `1h 02m 03s`, or `02m 03s` below one hour.
/// Durations wrap at a day; unknown durations render as `??m ??s`.
pub fn format_duration(duration: Option<Duration>) -> String {
    let duration = match duration {
        Some(duration) => duration,
        None => return "??m ??s".to_string(),
    };

    let seconds = duration.as_secs() % (24 * 3600);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{minutes:02}m {seconds:02}s")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn coin_flip_is_heads_or_tails() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..64 {
            let face = flip_coin(&mut rng);
            assert!(face == "Heads" || face == "Tails");
        }
    }

    #[test]
    fn pick_choice_returns_a_supplied_element() {
        let mut rng = StdRng::seed_from_u64(42);
        let choices = ["tea", "coffee", "water"];
        for _ in 0..64 {
            let picked = pick_choice(&mut rng, &choices).unwrap();
            assert!(choices.contains(&picked));
        }
    }

    #[test]
    fn pick_choice_on_empty_input_is_none() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(pick_choice(&mut rng, &[]), None);
    }

    #[test]
    fn missing_arg_fills_the_template() {
        assert_eq!(
            missing_arg("Guild Member"),
            "Command is missing argument(s) - Guild Member"
        );
        assert_eq!(
            missing_arg("Search Parameters(string | url)"),
            "Command is missing argument(s) - Search Parameters(string | url)"
        );
    }

    #[test]
    fn durations_below_an_hour_skip_the_hour_part() {
        assert_eq!(format_duration(Some(Duration::from_secs(125))), "02m 05s");
        assert_eq!(format_duration(Some(Duration::from_secs(0))), "00m 00s");
    }

    #[test]
    fn durations_above_an_hour_include_the_hour_part() {
        assert_eq!(format_duration(Some(Duration::from_secs(3723))), "1h 02m 03s");
        assert_eq!(
            format_duration(Some(Duration::from_secs(10 * 3600))),
            "10h 00m 00s"
        );
    }

    #[test]
    fn durations_wrap_at_a_day() {
        assert_eq!(
            format_duration(Some(Duration::from_secs(24 * 3600 + 5))),
            "00m 05s"
        );
    }

    #[test]
    fn unknown_durations_are_placeholders() {
        assert_eq!(format_duration(None), "??m ??s");
    }
}
