use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use recurcal_core::config::EngineConfig;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}\n\
            Pass --force to overwrite it.",
            path.display()
        );
    }

    EngineConfig::create_default_config(path)?;
    println!("{}", format!("Created {}", path.display()).green());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_template_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recurcal").join("config.toml");

        run(&path, false).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[expansion]"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[expansion]\nmax_instances = 12\n").unwrap();

        let err = run(&path, false).unwrap_err();
        assert!(err.to_string().contains("Config already exists"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[expansion]\nmax_instances = 12\n"
        );
    }

    #[test]
    fn force_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[expansion]\nmax_instances = 12\n").unwrap();

        run(&path, true).unwrap();
        let config = EngineConfig::load_from(&path).unwrap();
        assert_eq!(config.expansion.max_instances, 365);
    }
}
