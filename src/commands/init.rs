use crate::cli::InitArgs;
use crate::config::{CONFIG_FILE, generate_config_template};
use crate::fs::{FileSystem, default_fs};
use crate::style;

pub fn cmd_init(args: InitArgs) -> i32 {
    cmd_init_with_fs(args, default_fs())
}

pub fn cmd_init_with_fs(args: InitArgs, fs: &dyn FileSystem) -> i32 {
    let config_path = args.path.join(CONFIG_FILE);
    if fs.exists(&config_path) {
        style::error(&format!(
            "{} already exists at {}",
            CONFIG_FILE,
            style::path(&config_path)
        ));
        return 1;
    }

    let template = generate_config_template();
    if let Err(e) = fs.write(&config_path, &template) {
        style::error(&format!("Failed to write config file: {}", e));
        return 1;
    }

    style::success(&format!(
        "Created {} at {}",
        CONFIG_FILE,
        style::path(&config_path)
    ));
    if !fs.exists(&args.path.join("go.mod")) {
        style::hint("no go.mod here; set `module` in the config or run from the module root");
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fs::mock::MockFs;
    use std::path::{Path, PathBuf};

    fn args(path: &str) -> InitArgs {
        InitArgs {
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn test_init_writes_loadable_template() {
        let fs = MockFs::with_files([("/repo/go.mod", "module example.com/repo\n")]);

        assert_eq!(cmd_init_with_fs(args("/repo"), &fs), 0);

        let written = fs.get(Path::new("/repo/.layercheck.toml")).unwrap();
        assert_eq!(written, generate_config_template());

        let config = Config::load_with_fs(Path::new("/repo"), &fs).unwrap();
        assert_eq!(config.thresholds.max_import_depth, 5);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let fs = MockFs::with_files([("/repo/.layercheck.toml", "module = \"keep\"\n")]);

        assert_eq!(cmd_init_with_fs(args("/repo"), &fs), 1);
        assert_eq!(
            fs.get(Path::new("/repo/.layercheck.toml")).unwrap(),
            "module = \"keep\"\n"
        );
    }
}
