//! File name helpers shared by intake and export

use std::path::Path;

/// `name` with a numeric suffix before its last extension
///
/// `n == 0` returns the name unchanged.
///
/// # Examples
///
/// ```
/// use vault_domain::numbered_file_name;
///
/// assert_eq!(numbered_file_name("scan.pdf", 0), "scan.pdf");
/// assert_eq!(numbered_file_name("scan.pdf", 2), "scan-2.pdf");
/// assert_eq!(numbered_file_name("README", 1), "README-1");
/// ```
pub fn numbered_file_name(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }
    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!(
            "{}-{}.{}",
            stem.to_string_lossy(),
            n,
            ext.to_string_lossy()
        ),
        _ => format!("{}-{}", name, n),
    }
}
