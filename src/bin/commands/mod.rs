use lircconf::lircd_conf::{read_config, Remote};

pub mod dump;
pub mod list;

/// Read the remotes from the file or directory, or exit
fn read_remotes(input: &crate::Input) -> Vec<Remote> {
    match read_config(&input.path, input.accept_lirc_code) {
        Ok(remotes) => remotes,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}
