use std::io::Write;

use anyhow::{bail, Result};
use tracing::info;

use crate::cli::ConfigArgs;
use crate::config::{mask_token, resolve_credential, ConfigFile, CredentialPaths, CredentialSource};
use crate::error::ConfigError;
use crate::format::OutputFormat;

/// `config`: store the token and/or default format, or show what is in use.
pub fn run<W: Write>(args: &ConfigArgs, paths: &CredentialPaths, out: &mut W) -> Result<()> {
    if args.token.is_none() && args.default_format.is_none() {
        return show(paths, out);
    }

    let mut config = ConfigFile::load_or_default(&paths.config_file)?;

    if let Some(token) = &args.token {
        let token = token.trim();
        if token.is_empty() {
            bail!("token must not be empty");
        }
        config.token = Some(token.to_string());
    }
    if let Some(format) = args.default_format {
        config.default_format = Some(format);
    }

    config.save(&paths.config_file)?;
    info!(path = %paths.config_file.display(), "Saved configuration");
    writeln!(out, "Configuration saved to {}", paths.config_file.display())?;

    if args.show {
        writeln!(out)?;
        show(paths, out)?;
    }
    Ok(())
}

fn show<W: Write>(paths: &CredentialPaths, out: &mut W) -> Result<()> {
    match resolve_credential(paths) {
        Ok(credential) => {
            let kind = match &credential.source {
                CredentialSource::ConfigFile(_) => "config file",
                CredentialSource::LegacyTokenFile(_) => "token file",
            };
            writeln!(out, "Token: {}", mask_token(&credential.token))?;
            writeln!(out, "Source: {} ({kind})", credential.source.path().display())?;
            let format = credential.default_format.unwrap_or_default();
            writeln!(out, "Default format: {}", format_name(format))?;
        }
        Err(ConfigError::MissingCredential {
            config_file,
            legacy_token_file,
        }) => {
            writeln!(out, "No token configured. Looked in:")?;
            writeln!(out, "  {}", config_file.display())?;
            writeln!(out, "  {}", legacy_token_file.display())?;
            writeln!(out, "\nRun `x-cli config --token <TOKEN>` to set one.")?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Table => "table",
        OutputFormat::Json => "json",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::output;
    use std::fs;
    use tempfile::TempDir;

    fn config_args() -> ConfigArgs {
        ConfigArgs {
            token: None,
            default_format: None,
            show: false,
        }
    }

    #[test]
    fn test_set_token_writes_config_file() {
        let home = TempDir::new().unwrap();
        let paths = CredentialPaths::from_home(home.path());

        let args = ConfigArgs {
            token: Some("  AAAAtoken1234wxyz \n".into()),
            ..config_args()
        };
        let mut buf = Vec::new();
        run(&args, &paths, &mut buf).unwrap();

        assert!(output(buf).starts_with("Configuration saved to "));
        let saved = ConfigFile::load(&paths.config_file).unwrap();
        assert_eq!(saved.token.as_deref(), Some("AAAAtoken1234wxyz"));
        assert_eq!(saved.default_format, None);
    }

    #[test]
    fn test_set_format_keeps_existing_token_and_unknown_keys() {
        let home = TempDir::new().unwrap();
        let paths = CredentialPaths::from_home(home.path());
        fs::write(
            &paths.config_file,
            r#"{"token": "existing-token-value", "theme": "dark"}"#,
        )
        .unwrap();

        let args = ConfigArgs {
            default_format: Some(OutputFormat::Json),
            ..config_args()
        };
        run(&args, &paths, &mut Vec::new()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.config_file).unwrap()).unwrap();
        assert_eq!(raw["token"], "existing-token-value");
        assert_eq!(raw["defaultFormat"], "json");
        assert_eq!(raw["theme"], "dark");
    }

    #[test]
    fn test_empty_token_rejected() {
        let home = TempDir::new().unwrap();
        let paths = CredentialPaths::from_home(home.path());

        let args = ConfigArgs {
            token: Some("   ".into()),
            ..config_args()
        };
        assert!(run(&args, &paths, &mut Vec::new()).is_err());
        assert!(!paths.config_file.exists());
    }

    #[test]
    fn test_show_masks_token() {
        let home = TempDir::new().unwrap();
        let paths = CredentialPaths::from_home(home.path());
        fs::create_dir_all(paths.legacy_token_file.parent().unwrap()).unwrap();
        fs::write(&paths.legacy_token_file, "AAAAsecretsecretwxyz\n").unwrap();

        let mut buf = Vec::new();
        run(&config_args(), &paths, &mut buf).unwrap();

        let out = output(buf);
        assert!(out.contains("Token: AAAA…wxyz"));
        assert!(out.contains("(token file)"));
        assert!(out.contains("Default format: table"));
        assert!(!out.contains("secret"));
    }

    #[test]
    fn test_show_without_token_lists_both_paths() {
        let home = TempDir::new().unwrap();
        let paths = CredentialPaths::from_home(home.path());

        let mut buf = Vec::new();
        run(&config_args(), &paths, &mut buf).unwrap();

        let out = output(buf);
        assert!(out.starts_with("No token configured."));
        assert!(out.contains(&paths.config_file.display().to_string()));
        assert!(out.contains(&paths.legacy_token_file.display().to_string()));
    }
}
