use super::read_remotes;
use lircconf::lircd_conf::{GenerateOptions, RemoteSetBuilder, TomlSummary};

pub fn dump(args: &crate::Dump) {
    let remotes = read_remotes(&args.input);

    let options = GenerateOptions {
        parameters: args.parameters,
        raw: args.raw,
    };

    let source = args.input.path.display().to_string();

    match TomlSummary.build(&remotes, &source, options) {
        Ok(doc) => print!("{doc}"),
        Err(e) => {
            log::error!("{source}: {e}");
            std::process::exit(1);
        }
    }
}
