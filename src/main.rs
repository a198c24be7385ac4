use anyhow::Context;
use polysynth::runtime::native::{self, InputMode};
use polysynth::synth::instruments::InstrumentKind;
use polysynth::synth::SynthConfig;

const USAGE: &str = "usage: polysynth [bell|harmonica] [--keyboard | --midi-port N]";

fn parse_args() -> anyhow::Result<(SynthConfig, InputMode)> {
    let mut config = SynthConfig::default();
    let mut input_mode = InputMode::Midi(0);

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--keyboard" => input_mode = InputMode::Keyboard,
            "--midi-port" => {
                let port = args.next().context(USAGE)?;
                input_mode = InputMode::Midi(port.parse().context("invalid MIDI port index")?);
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            name => {
                config.instrument = name
                    .parse::<InstrumentKind>()
                    .map_err(anyhow::Error::msg)
                    .context(USAGE)?;
            }
        }
    }

    Ok((config, input_mode))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config, input_mode) = parse_args()?;
    native::start(config, input_mode).context("synth failed to start")?;
    Ok(())
}
