use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default settings file read by every binary in the workspace.
pub const DEFAULT_SETTINGS_FILE: &str = ".env";

/// `.env` settings file.
///
/// Reading follows dotenv syntax. Writing touches only the line of the key
/// being saved, so comments, `export` prefixes and quoting elsewhere in the
/// file stay as the user wrote them.
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load a single value by key. Missing file or key yields `None`.
    pub fn load_value(&self, key: &str) -> Option<String> {
        self.load_all().remove(key)
    }

    /// Load all key-value pairs. Lines dotenv cannot parse are skipped.
    pub fn load_all(&self) -> BTreeMap<String, String> {
        match dotenvy::from_path_iter(&self.path) {
            Ok(iter) => iter.filter_map(|item| item.ok()).collect(),
            Err(_) => BTreeMap::new(),
        }
    }

    /// Save a single key-value pair.
    ///
    /// An existing assignment of `key` is replaced in place (keeping its
    /// `export` prefix); otherwise the assignment is appended.
    pub fn save_value(&self, key: &str, value: &str) -> Result<()> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read {}", self.path.display()));
            }
        };

        let assignment = format!("{key}={}", quote_if_needed(value));
        let mut replaced = false;
        let mut lines: Vec<String> = contents
            .lines()
            .map(|line| match assigned_key(line) {
                Some((exported, existing)) if existing == key && !replaced => {
                    replaced = true;
                    if exported {
                        format!("export {assignment}")
                    } else {
                        assignment.clone()
                    }
                }
                _ => line.to_string(),
            })
            .collect();
        if !replaced {
            lines.push(assignment);
        }

        let mut output = lines.join("\n");
        output.push('\n');
        fs::write(&self.path, output)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Key assigned on a line, and whether the line carries `export`.
fn assigned_key(line: &str) -> Option<(bool, &str)> {
    let line = line.trim_start();
    if line.starts_with('#') {
        return None;
    }
    let (exported, rest) = match line.strip_prefix("export ") {
        Some(rest) => (true, rest.trim_start()),
        None => (false, line),
    };
    let (key, _) = rest.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then_some((exported, key))
}

fn quote_if_needed(value: &str) -> String {
    if value.chars().any(|c| c.is_whitespace() || c == '#' || c == '"' || c == '\'') {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings(name: &str) -> SettingsFile {
        let path = std::env::temp_dir().join(format!("{name}-{}.env", std::process::id()));
        let _ = fs::remove_file(&path);
        SettingsFile::new(path)
    }

    #[test]
    fn test_save_and_load_value() {
        let settings = temp_settings("settings_save_load");

        settings.save_value("KEY1", "value1").unwrap();
        assert_eq!(settings.load_value("KEY1"), Some("value1".to_string()));

        settings.delete().unwrap();
    }

    #[test]
    fn test_load_value_nonexistent() {
        let settings = SettingsFile::new("does-not-exist.env");
        assert_eq!(settings.load_value("KEY1"), None);
        assert!(settings.load_all().is_empty());
    }

    #[test]
    fn test_save_replaces_existing_value() {
        let settings = temp_settings("settings_preserve");

        settings.save_value("KEY1", "value1").unwrap();
        settings.save_value("KEY2", "value2").unwrap();
        settings.save_value("KEY1", "updated").unwrap();

        let all = settings.load_all();
        assert_eq!(all.get("KEY1"), Some(&"updated".to_string()));
        assert_eq!(all.get("KEY2"), Some(&"value2".to_string()));
        assert_eq!(
            fs::read_to_string(settings.path()).unwrap(),
            "KEY1=updated\nKEY2=value2\n"
        );

        settings.delete().unwrap();
    }

    #[test]
    fn test_dotenv_syntax() {
        let settings = temp_settings("settings_dotenv");
        fs::write(
            settings.path(),
            "# deployment settings\n\
             \n\
             WHITELIST_CONTRACT_ADDRESS=0x5FbDB2315678afecb367f032d93F642f64180aa3\n\
             export METADATA_URL=\"https://nft-collection-sneh1999.vercel.app/api/\"\n\
             QUOTED='single'\n\
             RPC_URL=http://127.0.0.1:8545 # local anvil\n",
        )
        .unwrap();

        assert_eq!(
            settings.load_value("WHITELIST_CONTRACT_ADDRESS").as_deref(),
            Some("0x5FbDB2315678afecb367f032d93F642f64180aa3")
        );
        assert_eq!(
            settings.load_value("METADATA_URL").as_deref(),
            Some("https://nft-collection-sneh1999.vercel.app/api/")
        );
        assert_eq!(settings.load_value("QUOTED").as_deref(), Some("single"));
        assert_eq!(
            settings.load_value("RPC_URL").as_deref(),
            Some("http://127.0.0.1:8545")
        );
        assert_eq!(settings.load_all().len(), 4);

        settings.delete().unwrap();
    }

    #[test]
    fn test_save_keeps_user_formatting() {
        let settings = temp_settings("settings_formatting");
        let original = "# my deploy key, do not share\n\
                        export PRIVATE_KEY=\"0xabc\"\n\
                        METADATA_URL=https://x/api/ # trailing comment\n";
        fs::write(settings.path(), original).unwrap();

        settings
            .save_value("CRYPTO_DEVS_CONTRACT_ADDRESS", "0x0000000000000000000000000000000000000001")
            .unwrap();

        let written = fs::read_to_string(settings.path()).unwrap();
        assert_eq!(
            written,
            format!("{original}CRYPTO_DEVS_CONTRACT_ADDRESS=0x0000000000000000000000000000000000000001\n")
        );
        assert_eq!(settings.load_value("PRIVATE_KEY").as_deref(), Some("0xabc"));
        assert_eq!(settings.load_value("METADATA_URL").as_deref(), Some("https://x/api/"));

        settings.delete().unwrap();
    }

    #[test]
    fn test_save_replaces_exported_line_in_place() {
        let settings = temp_settings("settings_exported");
        fs::write(
            settings.path(),
            "# contract\nexport CRYPTO_DEVS_CONTRACT_ADDRESS=0xold\nMETADATA_URL=https://x/api/\n",
        )
        .unwrap();

        settings
            .save_value("CRYPTO_DEVS_CONTRACT_ADDRESS", "0xnew")
            .unwrap();

        assert_eq!(
            fs::read_to_string(settings.path()).unwrap(),
            "# contract\nexport CRYPTO_DEVS_CONTRACT_ADDRESS=0xnew\nMETADATA_URL=https://x/api/\n"
        );

        settings.delete().unwrap();
    }

    #[test]
    fn test_values_with_spaces_are_quoted() {
        let settings = temp_settings("settings_quoted");

        settings.save_value("NAME", "Crypto Devs #1").unwrap();
        assert_eq!(fs::read_to_string(settings.path()).unwrap(), "NAME=\"Crypto Devs #1\"\n");
        assert_eq!(settings.load_value("NAME").as_deref(), Some("Crypto Devs #1"));

        settings.delete().unwrap();
    }

    #[test]
    fn test_delete() {
        let settings = temp_settings("settings_delete");

        settings.save_value("KEY1", "value1").unwrap();
        assert!(settings.exists());

        settings.delete().unwrap();
        assert!(!settings.exists());
    }
}
