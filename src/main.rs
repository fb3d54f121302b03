use strophe::{AppConfig, run};

fn main() {
    pretty_env_logger::init();
    run(AppConfig::new().title("Strophe").size(1280, 720));
}
