// An interactive property-map browser built on the Bevy game engine.

use perch::app::create_app;
use perch::cli::CliArgs;
use perch::logger::init_custom_logger;

fn main() {
    let args = CliArgs::parse_args();
    init_custom_logger(args.debug);
    create_app(args).run();
}
