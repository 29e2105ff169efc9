//! Tests for CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

use super::cli::{Cli, Command, SubscriptionsCommand};

mod parsing {
    use super::*;

    #[test]
    fn parse_global_options() {
        let cli = Cli::parse_from_iter([
            "graphlink",
            "--app-id",
            "123",
            "--app-secret",
            "s3cret",
            "--access-token",
            "tok",
            "--api-url",
            "http://localhost:9000",
            "--retry",
            "5",
            "subscriptions",
            "list",
        ]);

        assert_eq!(cli.app_id.as_deref(), Some("123"));
        assert_eq!(cli.app_secret.as_deref(), Some("s3cret"));
        assert_eq!(cli.access_token.as_deref(), Some("tok"));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cli.retry, Some(5));
        assert!(matches!(
            cli.command,
            Command::Subscriptions(SubscriptionsCommand::List)
        ));
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::parse_from_iter(["graphlink", "sign-request", "--app-secret", "s", "-v"]);

        assert_eq!(cli.app_secret.as_deref(), Some("s"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::SignRequest));
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from_iter(["graphlink", "-c", "/etc/graphlink.toml", "serve"]);

        assert_eq!(cli.config, Some(PathBuf::from("/etc/graphlink.toml")));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["graphlink"]).is_err());
    }
}

mod subscriptions {
    use super::*;

    #[test]
    fn add_splits_comma_separated_fields() {
        let cli = Cli::parse_from_iter([
            "graphlink",
            "subscriptions",
            "add",
            "--object",
            "user",
            "--fields",
            "name,email",
            "--fields",
            "friends",
            "--callback-url",
            "https://example.com/cb",
        ]);

        let Command::Subscriptions(SubscriptionsCommand::Add {
            object,
            fields,
            callback_url,
            verify_token,
        }) = cli.command
        else {
            panic!("expected subscriptions add");
        };
        assert_eq!(object, "user");
        assert_eq!(fields, ["name", "email", "friends"]);
        assert_eq!(callback_url, "https://example.com/cb");
        assert_eq!(verify_token, None);
    }

    #[test]
    fn add_requires_fields() {
        let result = Cli::try_parse_from([
            "graphlink",
            "subscriptions",
            "add",
            "--object",
            "user",
            "--callback-url",
            "https://example.com/cb",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn remove_object_is_optional() {
        let all = Cli::parse_from_iter(["graphlink", "subscriptions", "remove"]);
        let one = Cli::parse_from_iter(["graphlink", "subscriptions", "remove", "--object", "page"]);

        assert!(matches!(
            all.command,
            Command::Subscriptions(SubscriptionsCommand::Remove { object: None })
        ));
        assert!(matches!(
            one.command,
            Command::Subscriptions(SubscriptionsCommand::Remove { object: Some(ref o) }) if o == "page"
        ));
    }

    #[test]
    fn only_subscriptions_need_app_id() {
        let subscriptions = Cli::parse_from_iter(["graphlink", "subscriptions", "list"]);
        let serve = Cli::parse_from_iter(["graphlink", "serve"]);

        assert!(subscriptions.command.needs_app_id());
        assert!(!serve.command.needs_app_id());
    }
}

mod other_commands {
    use super::*;

    #[test]
    fn init_defaults_output() {
        let cli = Cli::parse_from_iter(["graphlink", "init"]);

        assert!(cli.is_init());
        assert!(matches!(
            cli.command,
            Command::Init { ref output } if output == &PathBuf::from("graphlink.toml")
        ));
    }

    #[test]
    fn serve_options() {
        let cli = Cli::parse_from_iter([
            "graphlink",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--path",
            "/hook",
            "--max-age",
            "unbounded",
        ]);

        assert!(!cli.is_init());
        let Command::Serve {
            bind,
            path,
            max_age,
        } = cli.command
        else {
            panic!("expected serve");
        };
        assert_eq!(bind.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(path.as_deref(), Some("/hook"));
        assert_eq!(max_age.as_deref(), Some("unbounded"));
    }

    #[test]
    fn decode_request_takes_positional() {
        let cli = Cli::parse_from_iter(["graphlink", "decode-request", "abc.def"]);

        assert!(matches!(
            cli.command,
            Command::DecodeRequest { ref signed_request } if signed_request == "abc.def"
        ));
    }
}
