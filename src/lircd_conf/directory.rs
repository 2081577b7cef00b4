use super::{parse, Remote};
use log::{info, warn};
use std::{collections::BTreeMap, fs, io, path::Path};

/// Files in lirc remote collections which are certainly not lircd.conf files
const REJECTED_EXTENSIONS: &[&str] = &[".jpg", ".png", ".gif", ".html"];

/// A remote which was given a new name, because the name was already taken
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Rename {
    pub from: String,
    pub to: String,
    pub source: String,
}

/// Should a directory entry with this file name be parsed at all
pub fn accept_file(name: &str) -> bool {
    let name = name.to_ascii_lowercase();

    !REJECTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Add remotes to a name-keyed collection. A remote whose name is already present gets
/// `$1`, `$2`, etc. appended to its name, whichever is free first. Nothing is logged;
/// the renames are returned.
pub fn merge(
    mut map: BTreeMap<String, Remote>,
    remotes: Vec<Remote>,
) -> (BTreeMap<String, Remote>, Vec<Rename>) {
    let mut renames = Vec::new();

    for mut remote in remotes {
        let mut name = remote.name.clone();
        let mut n = 1;

        while map.contains_key(&name) {
            name = format!("{}${n}", remote.name);
            n += 1;
        }

        if name != remote.name {
            renames.push(Rename {
                from: std::mem::replace(&mut remote.name, name.clone()),
                to: name.clone(),
                source: remote.source.clone(),
            });
        }

        map.insert(name, remote);
    }

    (map, renames)
}

/// Read a lircd.conf file, or all the files in a directory and its subdirectories. The
/// remotes from a directory are merged by name, and returned in name order.
pub fn read_config<P: AsRef<Path>>(path: P, accept_lirc_code: bool) -> io::Result<Vec<Remote>> {
    let path = path.as_ref();

    if path.is_file() {
        parse(path, accept_lirc_code)
    } else if path.is_dir() {
        let mut remotes = Vec::new();

        read_directory(path, accept_lirc_code, &mut remotes)?;

        // merge once, so that every new name is made from the name in the file
        let (map, renames) = merge(BTreeMap::new(), remotes);

        for Rename { from, to, source } in renames {
            warn!("remote name {from} (source: {source}) already present, renaming to {to}");
        }

        Ok(map.into_values().collect())
    } else {
        Err(not_found(path))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}

/// Collect the remotes of all files below this directory, in path order
fn read_directory(
    path: &Path,
    accept_lirc_code: bool,
    remotes: &mut Vec<Remote>,
) -> io::Result<()> {
    let mut entries = fs::read_dir(path)
        .and_then(|dir| {
            dir.map(|entry| entry.map(|e| e.path()))
                .collect::<io::Result<Vec<_>>>()
        })
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;

    // read_dir order is not defined, and renaming must not depend on it
    entries.sort();

    for entry in entries {
        let name = entry
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();

        if !accept_file(&name) {
            info!("rejecting file {}", entry.display());
            continue;
        }

        if entry.is_dir() {
            read_directory(&entry, accept_lirc_code, remotes)?;
        } else if entry.is_file() {
            remotes.extend(parse(&entry, accept_lirc_code)?);
        } else {
            return Err(not_found(&entry));
        }
    }

    Ok(())
}
