use anyhow::{bail, Context};
use phaseten_core::{
    validate_hit, validate_phase_with_assigned_wilds, Card, DealRng, Deck, DeckConfig, Event,
    EventBus, Group, GroupSpec, HitOutcome, HitVerdict, Meld, PhaseVerdict, PHASES,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const USAGE: &str = "usage:
  phaseten phases
  phaseten validate <phase> <cards.json|->
  phaseten hit <phase> <group.json> <card.json> [--apply] [--value N]
  phaseten deal [--seed N] [--seats K] [--config deck.json]
options:
  --quiet    do not print events to stderr";

const DEFAULT_SEATS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    apply: bool,
    quiet: bool,
    value: Option<u8>,
    seed: Option<u64>,
    seats: usize,
    config: Option<PathBuf>,
    positional: Vec<String>,
}

/// A lay is either a flat hand or the caller's own grouping.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayInput {
    Grouped(Vec<Vec<Card>>),
    Flat(Vec<Card>),
}

#[derive(Debug, Serialize)]
struct PhaseEntry {
    index: usize,
    description: &'static str,
    groups: &'static [GroupSpec],
}

#[derive(Debug, Serialize)]
struct AppliedHit<'a> {
    verdict: HitVerdict,
    group: Option<&'a Group>,
}

#[derive(Debug, Serialize)]
struct DealOutput {
    seed: u64,
    hands: Vec<Vec<Card>>,
    remaining: usize,
}

fn parse_cli_options(args: &[String]) -> anyhow::Result<CliOptions> {
    let mut options = CliOptions {
        apply: false,
        quiet: false,
        value: None,
        seed: None,
        seats: DEFAULT_SEATS,
        config: std::env::var_os("PHASETEN_CONFIG").map(PathBuf::from),
        positional: Vec::new(),
    };
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--apply" => options.apply = true,
            "--quiet" | "-q" => options.quiet = true,
            flag @ ("--value" | "--seed" | "--seats" | "--config") => {
                let Some(value) = args.get(idx + 1) else {
                    bail!("{flag} needs a value");
                };
                match flag {
                    "--value" => {
                        options.value =
                            Some(value.parse().with_context(|| format!("bad --value {value}"))?)
                    }
                    "--seed" => {
                        options.seed =
                            Some(value.parse().with_context(|| format!("bad --seed {value}"))?)
                    }
                    "--seats" => {
                        options.seats = value
                            .parse()
                            .with_context(|| format!("bad --seats {value}"))?
                    }
                    _ => options.config = Some(PathBuf::from(value)),
                }
                idx += 1;
            }
            other => options.positional.push(other.to_string()),
        }
        idx += 1;
    }
    Ok(options)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let options = parse_cli_options(args)?;
    let mut events = EventBus::default();
    let Some((command, rest)) = options.positional.split_first() else {
        bail!("{USAGE}");
    };
    let output = match (command.as_str(), rest) {
        ("phases", []) => serde_json::to_string_pretty(&phase_entries())?,
        ("validate", [phase, path]) => cmd_validate(parse_phase(phase)?, path, &mut events)?,
        ("hit", [phase, group, card]) => {
            cmd_hit(parse_phase(phase)?, group, card, &options, &mut events)?
        }
        ("deal", []) => cmd_deal(&options)?,
        _ => bail!("unrecognized arguments\n{USAGE}"),
    };
    if !options.quiet {
        for event in events.drain() {
            eprintln!("{}", format_event(&event));
        }
    }
    println!("{output}");
    Ok(())
}

fn parse_phase(raw: &str) -> anyhow::Result<usize> {
    raw.parse()
        .with_context(|| format!("phase must be a number, got {raw}"))
}

fn phase_entries() -> Vec<PhaseEntry> {
    PHASES
        .iter()
        .enumerate()
        .map(|(index, requirement)| PhaseEntry {
            index,
            description: requirement.description,
            groups: requirement.groups,
        })
        .collect()
}

fn cmd_validate(phase: usize, path: &str, events: &mut EventBus) -> anyhow::Result<String> {
    let verdict = match read_json::<LayInput>(path)? {
        LayInput::Flat(cards) => PhaseVerdict::from(Meld::lay(phase, &cards, events)),
        LayInput::Grouped(groups) => {
            PhaseVerdict::from(validate_phase_with_assigned_wilds(phase, &groups))
        }
    };
    Ok(serde_json::to_string_pretty(&verdict)?)
}

fn cmd_hit(
    phase: usize,
    group_path: &str,
    card_path: &str,
    options: &CliOptions,
    events: &mut EventBus,
) -> anyhow::Result<String> {
    let group: Group = read_json(group_path)?;
    let card: Card = read_json(card_path)?;
    if !options.apply {
        let verdict = HitVerdict::from(validate_hit(phase, &group, &card));
        return Ok(serde_json::to_string_pretty(&verdict)?);
    }
    let mut meld = Meld::new(phase, vec![group]);
    let placed = meld
        .hit(0, card, options.value, events)
        .map(|placed| match placed.effective_value() {
            Some(value) if placed.is_wild() => HitOutcome::Bind(value),
            _ => HitOutcome::Accept,
        });
    let applied = AppliedHit {
        verdict: HitVerdict::from(placed),
        group: meld.groups.first(),
    };
    Ok(serde_json::to_string_pretty(&applied)?)
}

fn cmd_deal(options: &CliOptions) -> anyhow::Result<String> {
    let config = load_deck_config(options.config.as_deref())?;
    let mut rng = options
        .seed
        .map(DealRng::from_seed)
        .unwrap_or_else(DealRng::from_entropy);
    let mut deck = Deck::standard(&config);
    deck.shuffle(&mut rng);
    let hands = deck.deal(options.seats, config.hand_size)?;
    let output = DealOutput {
        seed: rng.seed(),
        hands,
        remaining: deck.len(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn load_deck_config(path: Option<&Path>) -> anyhow::Result<DeckConfig> {
    let Some(path) = path else {
        return Ok(DeckConfig::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let body = if path == "-" {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("read stdin")?;
        body
    } else {
        fs::read_to_string(path).with_context(|| format!("read {path}"))?
    };
    serde_json::from_str(&body).with_context(|| format!("parse {path}"))
}

fn format_event(event: &Event) -> String {
    match event {
        Event::PhaseLaid {
            phase,
            groups,
            cards,
        } => {
            let shapes: Vec<String> = groups.iter().map(ToString::to_string).collect();
            format!("phase {phase} laid with {cards} cards: {}", shapes.join(", "))
        }
        Event::PhaseRejected { phase, reason } => format!("phase {phase} rejected: {reason}"),
        Event::HitApplied {
            group,
            card,
            assigned_value: Some(value),
        } => format!("group {group}: card {card} placed as {value}"),
        Event::HitApplied {
            group,
            card,
            assigned_value: None,
        } => format!("group {group}: card {card} placed"),
        Event::WildValueRequired {
            group,
            card,
            possible_values,
        } => format!("group {group}: wild {card} needs --value, one of {possible_values:?}"),
        Event::HitRejected {
            group,
            card,
            reason,
        } => format!("group {group}: card {card} rejected: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phaseten_core::Color;
    use serde_json::Value;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "phaseten_cli_test_{tag}_{}_{}.json",
            std::process::id(),
            nanos
        ))
    }

    fn write_json<T: Serialize>(tag: &str, value: &T) -> PathBuf {
        let path = unique_temp_file(tag);
        fs::write(&path, serde_json::to_string(value).expect("serialize")).expect("write");
        path
    }

    fn run_of_blue(values: &[u8]) -> Group {
        let cards = values
            .iter()
            .zip(1u32..)
            .map(|(&value, id)| Card::number(id, Color::Blue, value))
            .collect();
        Group::new(GroupSpec::Run(values.len()), cards)
    }

    fn hit_with(raw_flags: &str, events: &mut EventBus) -> Value {
        let group = write_json("group", &run_of_blue(&[3, 4, 5, 6]));
        let card = write_json("card", &Card::wild(40));
        let options = parse_cli_options(&args(raw_flags)).expect("options");
        let output = cmd_hit(
            1,
            &group.to_string_lossy(),
            &card.to_string_lossy(),
            &options,
            events,
        )
        .expect("hit");
        let _ = fs::remove_file(group);
        let _ = fs::remove_file(card);
        serde_json::from_str(&output).expect("json output")
    }

    #[test]
    fn applied_hit_binds_chosen_value_and_prints_group() {
        let mut events = EventBus::default();
        let output = hit_with("--apply --value 7", &mut events);
        assert_eq!(output["verdict"]["ok"], true);
        assert_eq!(output["verdict"]["assigned_value"], 7);
        let cards = output["group"]["cards"].as_array().expect("cards");
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[4]["type"], "wild");
        assert_eq!(cards[4]["assigned_value"], 7);
        let drained: Vec<Event> = events.drain().collect();
        assert!(matches!(
            drained.as_slice(),
            [Event::HitApplied {
                assigned_value: Some(7),
                ..
            }]
        ));
    }

    #[test]
    fn applied_hit_without_value_leaves_group_alone() {
        let mut events = EventBus::default();
        let output = hit_with("--apply", &mut events);
        assert_eq!(output["verdict"]["ok"], false);
        assert_eq!(output["verdict"]["rejection"]["reason"], "ambiguous_wildcard");
        assert_eq!(output["verdict"]["rejection"]["detail"], serde_json::json!([2, 7]));
        assert_eq!(output["group"]["cards"].as_array().map(Vec::len), Some(4));
        let drained: Vec<Event> = events.drain().collect();
        assert!(matches!(drained.as_slice(), [Event::WildValueRequired { .. }]));
    }

    #[test]
    fn dry_hit_lists_possible_values() {
        let mut events = EventBus::default();
        let output = hit_with("", &mut events);
        assert_eq!(output["ok"], true);
        assert_eq!(output["possible_values"], serde_json::json!([2, 7]));
        assert!(events.is_empty());
    }

    #[test]
    fn validate_reads_a_flat_hand() {
        let hand = vec![
            Card::number(1, Color::Red, 4),
            Card::number(2, Color::Blue, 4),
            Card::wild(3),
            Card::number(4, Color::Green, 9),
            Card::number(5, Color::Yellow, 9),
            Card::number(6, Color::Red, 9),
        ];
        let path = write_json("hand", &hand);
        let mut events = EventBus::default();
        let output = cmd_validate(0, &path.to_string_lossy(), &mut events).expect("validate");
        let _ = fs::remove_file(path);
        let verdict: PhaseVerdict = serde_json::from_str(&output).expect("verdict");
        assert!(verdict.ok);
        assert_eq!(verdict.groups.len(), 2);
        let drained: Vec<Event> = events.drain().collect();
        assert!(matches!(drained.as_slice(), [Event::PhaseLaid { cards: 6, .. }]));
    }

    #[test]
    fn seeded_deal_is_reproducible() {
        let config = write_json("deck", &DeckConfig::default());
        let raw = format!("deal --seed 9 --seats 3 --config {}", config.display());
        let options = parse_cli_options(&args(&raw)).expect("options");
        let first: Value = serde_json::from_str(&cmd_deal(&options).expect("deal")).expect("json");
        let second: Value =
            serde_json::from_str(&cmd_deal(&options).expect("deal")).expect("json");
        let _ = fs::remove_file(config);
        assert_eq!(first, second);
        assert_eq!(first["seed"], 9);
        assert_eq!(first["hands"].as_array().map(Vec::len), Some(3));
        assert_eq!(first["remaining"], 78);
    }

    #[test]
    fn oversized_seat_count_is_an_error() {
        let raw = format!("deal --seed 1 --seats {}", usize::MAX);
        let options = parse_cli_options(&args(&raw)).expect("options");
        let err = cmd_deal(&options).expect_err("too many seats");
        assert!(err.to_string().contains("cannot seat"));
    }

    fn args(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn options_split_flags_from_positionals() {
        let options =
            parse_cli_options(&args("hit 1 group.json card.json --apply --value 7 -q"))
                .expect("options");
        assert!(options.apply);
        assert!(options.quiet);
        assert_eq!(options.value, Some(7));
        assert_eq!(options.positional, args("hit 1 group.json card.json"));
    }

    #[test]
    fn missing_flag_value_is_an_error() {
        let err = parse_cli_options(&args("deal --seed")).expect_err("missing seed");
        assert!(err.to_string().contains("--seed"));
        assert!(parse_cli_options(&args("deal --seats many")).is_err());
    }

    #[test]
    fn lay_input_accepts_flat_and_grouped() {
        let flat: LayInput =
            serde_json::from_str(r#"[{"id":1,"type":"wild"},{"id":2,"type":"skip"}]"#)
                .expect("flat");
        assert!(matches!(flat, LayInput::Flat(ref cards) if cards.len() == 2));

        let grouped: LayInput = serde_json::from_str(
            r#"[[{"id":1,"type":"number","color":"red","value":9}],[{"id":2,"type":"wild","assigned_value":4}]]"#,
        )
        .expect("grouped");
        assert!(matches!(grouped, LayInput::Grouped(ref groups) if groups.len() == 2));
    }

    #[test]
    fn events_render_as_single_lines() {
        let line = format_event(&Event::WildValueRequired {
            group: 1,
            card: phaseten_core::CardId(4),
            possible_values: vec![2, 7],
        });
        assert_eq!(line, "group 1: wild #4 needs --value, one of [2, 7]");
    }
}
