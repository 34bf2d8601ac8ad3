const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;
const GB: u64 = 1024 * 1024 * 1024;

/// Render a byte count the way the file manager displays it: whole bytes
/// below 1 KB, otherwise two decimals in the largest fitting unit.
pub fn humanize_size(bytes: u64) -> String {
    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format!("{:.2} KB", bytes as f64 / KB as f64);
    }
    if bytes < GB {
        return format!("{:.2} MB", bytes as f64 / MB as f64);
    }

    return format!("{:.2} GB", bytes as f64 / GB as f64);
}
