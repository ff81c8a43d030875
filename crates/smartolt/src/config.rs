//! CLI configuration: thin wrapper around `smartolt_config`.
//!
//! Adds the resolution steps that respect `GlobalOpts` flag overrides
//! (--url, --token, --insecure, --timeout).

use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;
use smartolt_api::{ClientConfig, TlsMode, TransportConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::{CliError, RequestContext};

pub use smartolt_config::{
    Config, Profile, config_path, load_config_or_default, parse_base_url, save_config,
    store_keyring_token,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Output format from `--output`, falling back to `defaults.output`.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.clone().unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or_default()
    })
}

/// Build the client configuration and the context used for error reports.
///
/// A matching profile supplies the base; flags override it. Without a
/// profile, `--url` and `--token` must both be given.
pub fn client_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<(ClientConfig, RequestContext), CliError> {
    let profile_name = active_profile_name(global, config);

    let client_config = match config.profiles.get(&profile_name) {
        Some(profile) => resolve_profile(profile, &profile_name, global, config)?,
        None => from_flags(global, config, &profile_name)?,
    };

    let ctx = RequestContext {
        url: client_config.base_url.to_string(),
        profile: profile_name,
        timeout_secs: client_config.transport.timeout.as_secs(),
    };
    Ok((client_config, ctx))
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    config: &Config,
) -> Result<ClientConfig, CliError> {
    let base_url = match global.url.as_deref() {
        Some(raw) => parse_base_url(raw)?,
        None => profile.parsed_base_url()?,
    };

    let token = match global.token.as_deref() {
        Some(token) => SecretString::from(token.to_owned()),
        None => smartolt_config::resolve_token(profile, profile_name)?,
    };

    let tls = if global.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        smartolt_config::tls_mode(profile, &config.defaults)
    };

    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    Ok(ClientConfig {
        base_url,
        token,
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(timeout),
        },
    })
}

/// No profile on disk: everything comes from flags / env vars.
fn from_flags(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<ClientConfig, CliError> {
    let Some(raw_url) = global.url.as_deref() else {
        if global.profile.is_some() && !config.profiles.is_empty() {
            let mut names: Vec<_> = config.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name.into(),
                available: names.join(", "),
            });
        }
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };
    let base_url = parse_base_url(raw_url)?;

    let token = global
        .token
        .as_deref()
        .map(|t| SecretString::from(t.to_owned()))
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let tls = if global.insecure || config.defaults.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };

    Ok(ClientConfig {
        base_url,
        token,
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(global.timeout.unwrap_or(config.defaults.timeout)),
        },
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["smartolt"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["odb", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_lab() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                base_url: "https://lab.smartolt.com/api".into(),
                token: Some("from-file".into()),
                timeout: Some(45),
                ..Profile::default()
            },
        );
        cfg.default_profile = Some("lab".into());
        cfg
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with_lab();
        let g = global(&[
            "--url",
            "https://other.smartolt.com/api",
            "--token",
            "from-flag",
            "--timeout",
            "5",
            "-k",
        ]);

        let (client, ctx) = client_config(&g, &cfg).unwrap();

        assert_eq!(client.base_url.as_str(), "https://other.smartolt.com/api");
        assert_eq!(client.token.expose_secret(), "from-flag");
        assert_eq!(client.transport.timeout, Duration::from_secs(5));
        assert!(matches!(client.transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(ctx.profile, "lab");
        assert_eq!(ctx.timeout_secs, 5);
    }

    #[test]
    fn profile_timeout_used_without_flag() {
        let cfg = config_with_lab();
        let g = global(&["--token", "from-flag"]);

        let (client, _) = client_config(&g, &cfg).unwrap();

        assert_eq!(client.base_url.as_str(), "https://lab.smartolt.com/api");
        assert_eq!(client.transport.timeout, Duration::from_secs(45));
    }

    #[test]
    fn flags_alone_build_a_client() {
        let g = global(&["--url", "https://acme.smartolt.com/api", "--token", "t"]);

        let (client, ctx) = client_config(&g, &Config::default()).unwrap();

        assert_eq!(client.base_url.as_str(), "https://acme.smartolt.com/api");
        assert_eq!(ctx.profile, "default");
        assert!(matches!(client.transport.tls, TlsMode::System));
    }

    #[test]
    fn missing_everything_is_no_config() {
        let err = client_config(&global(&[]), &Config::default()).unwrap_err();

        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn url_without_token_is_no_credentials() {
        let g = global(&["--url", "https://acme.smartolt.com/api"]);

        let err = client_config(&g, &Config::default()).unwrap_err();

        assert!(matches!(err, CliError::NoCredentials { .. }));
    }

    #[test]
    fn unknown_profile_lists_available() {
        let cfg = config_with_lab();
        let g = global(&["--profile", "prod"]);

        match client_config(&g, &cfg).unwrap_err() {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "prod");
                assert_eq!(available, "lab");
            }
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn output_falls_back_to_config_default() {
        let mut cfg = Config::default();
        cfg.defaults.output = "json".into();

        assert_eq!(output_format(&global(&[]), &cfg), OutputFormat::Json);
        assert_eq!(
            output_format(&global(&["-o", "yaml"]), &cfg),
            OutputFormat::Yaml
        );
    }
}
