use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;

struct LogEntry {
    domain: String,
    message: String,
    timestamp: String,
}

lazy_static::lazy_static! {
    static ref LOG_TX: Mutex<Option<mpsc::Sender<LogEntry>>> = Mutex::new(None);
    static ref LOG_DIR_PATH: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// File name for a log domain. Unknown domains share `custom.log`.
pub fn log_file_name(domain: &str) -> &'static str {
    match domain {
        "app" => "app.log",
        "audit" => "audit.log",
        "extension" => "extension.log",
        "download" => "download.log",
        "crash" => "crash.log",
        _ => "custom.log",
    }
}

fn domain_prefix(domain: &str) -> &'static str {
    match domain {
        "audit" => "[AUDIT]",
        "extension" => "[EXTENSION]",
        "download" => "[DOWNLOAD]",
        "crash" => "[CRASH]",
        _ => "",
    }
}

fn format_line(entry: &LogEntry) -> String {
    let prefix = domain_prefix(&entry.domain);
    if !prefix.is_empty() && !entry.message.contains(prefix) {
        format!("[{}] {} {}", entry.timestamp, prefix, entry.message)
    } else {
        format!("[{}] {}", entry.timestamp, entry.message)
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the log directory and start the background logger thread
pub fn init_log_dir(path: PathBuf) {
    if let Ok(mut dir) = LOG_DIR_PATH.lock() {
        *dir = Some(path.clone());
    }

    let (tx, rx) = mpsc::channel::<LogEntry>();

    if let Ok(mut global_tx) = LOG_TX.lock() {
        *global_tx = Some(tx);
    }

    thread::spawn(move || {
        let mut file_cache: HashMap<&'static str, File> = HashMap::new();
        let log_dir = path.join("logs");

        if !log_dir.exists() {
            let _ = std::fs::create_dir_all(&log_dir);
        }

        while let Ok(entry) = rx.recv() {
            let filename = log_file_name(&entry.domain);

            if !file_cache.contains_key(filename) {
                match open_append(&log_dir.join(filename)) {
                    Ok(file) => {
                        file_cache.insert(filename, file);
                    }
                    Err(e) => {
                        eprintln!("Failed to open {}: {}", filename, e);
                        continue;
                    }
                }
            }

            if let Some(file) = file_cache.get_mut(filename) {
                if let Err(e) = writeln!(file, "{}", format_line(&entry)) {
                    eprintln!("Failed to write log: {}", e);
                    // Reopen on the next entry.
                    file_cache.remove(filename);
                }
            }
        }
    });
}

/// Setup panic hook to log crashes to crash.log
/// Note: Panic hook runs in the crashing thread, so we avoid using the channel
/// to ensure we can write even if the logger thread is dead.
pub fn setup_panic_hook() {
    panic::set_hook(Box::new(|info| {
        let msg = format!(
            "{}\nBacktrace: {:?}\n",
            info,
            std::backtrace::Backtrace::capture()
        );
        eprintln!("{}", msg);

        if let Ok(guard) = LOG_DIR_PATH.lock() {
            if let Some(ref dir) = *guard {
                let crash_file = dir.join("logs").join(log_file_name("crash"));
                if let Some(parent) = crash_file.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }

                if let Ok(mut file) = open_append(&crash_file) {
                    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                    let _ = writeln!(file, "[{}] {}", timestamp, msg);
                }
            }
        }
    }));
}

/// Queue a message to be written to a specialized domain log file
pub fn write_domain_log(domain: &str, message: &str) -> std::io::Result<()> {
    if let Ok(guard) = LOG_TX.lock() {
        if let Some(tx) = &*guard {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            let _ = tx.send(LogEntry {
                domain: domain.to_string(),
                message: message.to_string(),
                timestamp,
            });
            return Ok(());
        }
    }
    Err(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Logger not initialized",
    ))
}

/// Last `lines` lines of a log file; an absent file reads as empty.
pub fn read_log_tail(path: &Path, lines: usize) -> std::io::Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let all_lines: Vec<String> = reader
        .split(b'\n')
        .filter_map(|line| line.ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .collect();

    let skip = all_lines.len().saturating_sub(lines);
    Ok(all_lines.into_iter().skip(skip).collect())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub fn get_logs(log_name: String, lines: usize) -> Result<Vec<String>, String> {
    let known = ["app", "audit", "extension", "download", "crash"];
    if !known.contains(&log_name.as_str()) {
        return Err(format!("Unknown log name: {}", log_name));
    }

    let root_dir = crate::config::get_app_root_dir().map_err(|e| e.to_string())?;
    let log_path = root_dir.join("logs").join(log_file_name(&log_name));
    read_log_tail(&log_path, lines).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_names() {
        assert_eq!(log_file_name("extension"), "extension.log");
        assert_eq!(log_file_name("download"), "download.log");
        assert_eq!(log_file_name("whatever"), "custom.log");
    }

    #[test]
    fn test_prefix_is_not_doubled() {
        let entry = LogEntry {
            domain: "audit".into(),
            message: "[AUDIT] Removed extension".into(),
            timestamp: "2024-01-01 00:00:00".into(),
        };
        assert_eq!(
            format_line(&entry),
            "[2024-01-01 00:00:00] [AUDIT] Removed extension"
        );

        let entry = LogEntry {
            domain: "extension".into(),
            message: "Script 'dark' executed".into(),
            timestamp: "t".into(),
        };
        assert_eq!(format_line(&entry), "[t] [EXTENSION] Script 'dark' executed");
    }

    #[test]
    fn test_read_log_tail() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("audit.log");
        std::fs::write(&path, "one\ntwo\nthree\n").unwrap();

        let tail = read_log_tail(&path, 2).unwrap();
        assert_eq!(tail, vec!["two".to_string(), "three".to_string()]);

        let missing = read_log_tail(&temp.path().join("none.log"), 5).unwrap();
        assert!(missing.is_empty());
    }
}
