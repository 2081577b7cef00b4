use super::read_remotes;

pub fn list(args: &crate::List) {
    let remotes = read_remotes(&args.input);

    if remotes.is_empty() {
        log::warn!("{}: no remotes found", args.input.path.display());
    }

    for remote in &remotes {
        println!(
            "{}\t{}\t{} codes\t{}\t{}",
            remote.name,
            remote.driver.as_deref().unwrap_or("-"),
            remote.commands.len(),
            if remote.timing_info {
                "timing"
            } else {
                "lirccode"
            },
            remote.source
        );
    }
}
