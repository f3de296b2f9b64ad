use crate::constants::LIST_TIME_FORMAT;
use chrono::{DateTime, Local};
use log::warn;
use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs;

/// Builds the LIST payload for `dir`: one CRLF-terminated line per visible
/// entry, sorted by name. Hidden (dot) entries are skipped.
pub async fn list_directory(dir: &Path) -> io::Result<String> {
    let mut entries = fs::read_dir(dir).await?;
    let mut lines = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }

        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(
                    "Failed to get metadata for entry: {:?}, error: {:?}",
                    entry.path(),
                    e
                );
                continue;
            }
        };

        lines.push((name.clone(), format_entry(&name, &metadata)));
    }

    lines.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(lines.into_iter().map(|(_, line)| line).collect())
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// `drwxr-x--- 1 1000 1000       4096 Jan 05 13:37 name\r\n`
pub fn format_entry(name: &str, metadata: &Metadata) -> String {
    let (owner, group) = owner_and_group(metadata);
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

    format!(
        "{} 1 {} {} {:>10} {} {}\r\n",
        permissions(metadata),
        owner,
        group,
        metadata.len(),
        format_time(modified),
        name
    )
}

pub fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(LIST_TIME_FORMAT)
        .to_string()
}

#[cfg(unix)]
fn permissions(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode();
    let mut perms = String::with_capacity(10);
    perms.push(if metadata.is_dir() { 'd' } else { '-' });

    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        perms.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        perms.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        perms.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    perms
}

#[cfg(not(unix))]
fn permissions(metadata: &Metadata) -> String {
    let kind = if metadata.is_dir() { 'd' } else { '-' };
    let write = if metadata.permissions().readonly() { '-' } else { 'w' };
    format!("{}r{}-------", kind, write)
}

#[cfg(unix)]
fn owner_and_group(metadata: &Metadata) -> (String, String) {
    use std::os::unix::fs::MetadataExt;
    (metadata.uid().to_string(), metadata.gid().to_string())
}

#[cfg(not(unix))]
fn owner_and_group(_metadata: &Metadata) -> (String, String) {
    (String::from("owner"), String::from("group"))
}
