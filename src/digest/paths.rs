use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const MANIFEST_FILE_NAME: &str = "index.json";
pub const FRAGMENT_FILE_NAME: &str = "news_content.html";

#[derive(Debug, Clone)]
pub struct NewsPaths {
    pub home: PathBuf,
    pub archive_dir: PathBuf,
    pub manifest_file: PathBuf,
    pub fragment_file: PathBuf,
    pub logs_dir: PathBuf,
}

impl NewsPaths {
    pub fn under(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            archive_dir: home.join("news"),
            manifest_file: home.join(MANIFEST_FILE_NAME),
            fragment_file: home.join(FRAGMENT_FILE_NAME),
            logs_dir: home.join("logs"),
            home,
        }
    }

    /// File names the archive scanner must never treat as entries.
    pub fn reserved_names(&self) -> Vec<String> {
        let mut out = vec![MANIFEST_FILE_NAME.to_string()];
        if let Some(name) = self.manifest_file.file_name().and_then(|n| n.to_str())
            && name != MANIFEST_FILE_NAME
        {
            out.push(name.to_string());
        }
        out
    }
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<NewsPaths> {
    let cwd = env::current_dir().context("current directory could not be resolved")?;
    let home = env_or_default_path("NEWS_HOME", cwd);
    let defaults = NewsPaths::under(home);

    Ok(NewsPaths {
        archive_dir: env_or_default_path("NEWS_ARCHIVE_DIR", defaults.archive_dir),
        manifest_file: env_or_default_path("NEWS_MANIFEST_FILE", defaults.manifest_file),
        fragment_file: env_or_default_path("NEWS_FRAGMENT_FILE", defaults.fragment_file),
        logs_dir: env_or_default_path("NEWS_LOGS_DIR", defaults.logs_dir),
        home: defaults.home,
    })
}

#[cfg(test)]
mod tests {
    use super::NewsPaths;
    use std::path::PathBuf;

    #[test]
    fn defaults_live_under_home() {
        let paths = NewsPaths::under("/srv/site");
        assert_eq!(paths.archive_dir, PathBuf::from("/srv/site/news"));
        assert_eq!(paths.manifest_file, PathBuf::from("/srv/site/index.json"));
        assert_eq!(
            paths.fragment_file,
            PathBuf::from("/srv/site/news_content.html")
        );
    }

    #[test]
    fn reserved_names_include_custom_manifest_name() {
        let mut paths = NewsPaths::under("/srv/site");
        assert_eq!(paths.reserved_names(), vec!["index.json".to_string()]);

        paths.manifest_file = PathBuf::from("/srv/site/news/catalog.json");
        assert_eq!(
            paths.reserved_names(),
            vec!["index.json".to_string(), "catalog.json".to_string()]
        );
    }
}
