use MechBox::Mechanism::converter_api::MechConverter;
use MechBox::settings::Settings;
use log::error;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

pub fn main() {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap();

    // optional path to a JSON settings file; defaults otherwise
    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::from_json_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let mut converter = MechConverter::new(settings);
    if let Err(e) = converter.convert_main() {
        error!("conversion failed: {}", e);
        std::process::exit(1);
    }
    converter.pretty_print_stats();
}
