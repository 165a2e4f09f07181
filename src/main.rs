use std::env;

use log::error;

use bitkit::engine::use_command;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        error!(
            "Usage:\n  {0} decode <bencoded_string>\n  {0} info <file.torrent>\n  {0} peers <file.torrent>",
            args[0]
        );
        return;
    }

    if let Err(e) = use_command(args) {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}
