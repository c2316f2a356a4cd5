//! End-to-end tests for the dispatch engine: registration, parsing, help
//! routing and listener notification.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use strictargs_core::{
    CommandConfig, CommandError, DeclarationError, ErrorCode, FailureReporter, FlagConfig,
    FlagError, ParseError, ParseOutcome, ParsedCommand, StrictArgs,
};

/// Write sink the tests can read back after handing it to the engine.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reporter that remembers the exit code of every failure it sees.
#[derive(Clone, Default)]
struct RecordingReporter(Rc<RefCell<Vec<i32>>>);

impl FailureReporter for RecordingReporter {
    fn report_failure(&self, error: &ParseError) {
        self.0.borrow_mut().push(error.exit_code());
    }
}

type Calls = Rc<RefCell<Vec<String>>>;

fn args(values: &[&str]) -> Vec<String> {
    ["prog", "prog"]
        .iter()
        .chain(values)
        .map(|s| s.to_string())
        .collect()
}

fn fake_cli(output: &SharedBuffer) -> StrictArgs {
    let mut cli = StrictArgs::new("fake-cli")
        .with_description("A fake CLI tool to test against.")
        .with_output(output.clone());
    cli.register_global_flag(FlagConfig::switch("verbose", "Print more."))
        .unwrap();
    cli.register_global_flag(FlagConfig::value("env", "Target environment.").with_default("dev"))
        .unwrap();
    cli.register_command(
        CommandConfig::new("start", "Starts the webserver.")
            .syntax_hint("start <server name> [options...]")
            .allow_positional_args()
            .flag(FlagConfig::value("port", "The port to run on.").with_default("8080"))
            .flag(FlagConfig::switch("open", "Opens a browser.")),
    )
    .unwrap();
    cli.register_command(CommandConfig::new("status", "Checks the status.")).unwrap();
    cli
}

/// Listener that records `label` each time it runs.
fn recorder(
    calls: &Calls,
    label: &'static str,
) -> impl FnMut(&ParsedCommand, &[String]) -> anyhow::Result<()> {
    let calls = Rc::clone(calls);
    move |_command: &ParsedCommand, _args: &[String]| -> anyhow::Result<()> {
        calls.borrow_mut().push(label.to_string());
        Ok(())
    }
}

mod registration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registers_a_command_by_name() {
        let mut cli = StrictArgs::new("t");
        let name = cli
            .register_command(CommandConfig::new("flagname", ""))
            .unwrap()
            .name()
            .to_string();

        assert_eq!(name, "flagname");
        assert!(cli.command("flagname").is_some());
    }

    #[test]
    fn builtins_are_registered() {
        let cli = StrictArgs::new("t");
        assert!(cli.command("help").is_some_and(|c| c.is_builtin()));
        assert!(cli.global_flag("help").is_some_and(|f| f.is_builtin()));
    }

    #[test]
    fn rejects_duplicate_command() {
        let mut cli = StrictArgs::new("t");
        cli.register_command(CommandConfig::new("flagname", "")).unwrap();
        let err = cli
            .register_command(CommandConfig::new("flagname", "description"))
            .unwrap_err();
        assert_eq!(err, DeclarationError::DuplicateCommand("flagname".into()));
    }

    #[test]
    fn rejects_command_flag_clashing_with_global() {
        let mut cli = StrictArgs::new("t");
        cli.register_global_flag(FlagConfig::switch("myflag", "")).unwrap();
        let err = cli
            .register_command(
                CommandConfig::new("flagname", "").flag(FlagConfig::switch("myflag", "another")),
            )
            .unwrap_err();
        assert_eq!(err, DeclarationError::DuplicateGlobalFlag("myflag".into()));
    }

    #[test]
    fn rejects_global_flag_registered_twice() {
        let mut cli = StrictArgs::new("t");
        cli.register_global_flag(FlagConfig::switch("flagname", "")).unwrap();
        let err = cli
            .register_global_flag(FlagConfig::value("flagname", ""))
            .unwrap_err();
        assert_eq!(err, DeclarationError::DuplicateGlobalFlag("flagname".into()));
    }

    #[test]
    fn rejects_global_flag_already_in_a_command() {
        let mut cli = StrictArgs::new("t");
        cli.register_command(
            CommandConfig::new("mycommand", "").flag(FlagConfig::switch("flagname", "")),
        )
        .unwrap();
        let err = cli
            .register_global_flag(FlagConfig::switch("flagname", ""))
            .unwrap_err();
        assert!(err.to_string().contains("flagname"));
        assert!(err.to_string().contains("mycommand"));
    }

    #[test]
    fn reserved_names_are_rejected_everywhere() {
        let mut cli = StrictArgs::new("t");
        assert_eq!(
            cli.register_command(CommandConfig::new("help", "")).unwrap_err(),
            DeclarationError::ReservedName("help".into())
        );
        assert_eq!(
            cli.register_global_flag(FlagConfig::switch("help", "")).unwrap_err(),
            DeclarationError::ReservedName("help".into())
        );
        assert_eq!(
            cli.register_command(CommandConfig::new("x", "").flag(FlagConfig::value("help", "")))
                .unwrap_err(),
            DeclarationError::ReservedName("help".into())
        );
    }

    #[test]
    fn listener_needs_a_registered_command() {
        let mut cli = StrictArgs::new("t");
        let calls = Calls::default();
        let err = cli.add_command_listener("nope", recorder(&calls, "x")).unwrap_err();
        assert_eq!(err, DeclarationError::UnknownCommand("nope".into()));
    }
}

mod parsing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_flags_and_positional_args() {
        let output = SharedBuffer::default();
        let mut cli = StrictArgs::new("t").with_output(output);
        cli.register_command(
            CommandConfig::new("run", "")
                .allow_positional_args()
                .flag(FlagConfig::switch("a", ""))
                .flag(FlagConfig::value("b", "")),
        )
        .unwrap();

        let seen: Rc<RefCell<Option<ParsedCommand>>> = Rc::default();
        let sink = Rc::clone(&seen);
        cli.add_command_listener(
            "run",
            move |command: &ParsedCommand, _args: &[String]| -> anyhow::Result<()> {
                *sink.borrow_mut() = Some(command.clone());
                Ok(())
            },
        )
        .unwrap();

        let outcome = cli.parse(&args(&["run", "--a", "-b", "v", "x"])).unwrap();
        assert_eq!(outcome, ParseOutcome::Dispatched { command: "run".into() });

        let seen = seen.borrow();
        let command = seen.as_ref().unwrap();
        assert!(command.is_present("a"));
        assert!(command.is_present("b"));
        assert_eq!(command.get("b").unwrap(), "v");
        assert_eq!(command.args().unwrap(), ["x".to_string()]);
    }

    #[test]
    fn globals_are_stripped_anywhere_before_command_lookup() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);

        let seen: Rc<RefCell<Vec<(bool, String, String)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        cli.add_command_listener(
            "start",
            move |command: &ParsedCommand, _args: &[String]| -> anyhow::Result<()> {
                sink.borrow_mut().push((
                    command.is_present("verbose"),
                    command.get("env")?.to_string(),
                    command.get("port")?.to_string(),
                ));
                Ok(())
            },
        )
        .unwrap();

        cli.parse(&args(&["-env", "prod", "start", "--verbose", "web"])).unwrap();
        cli.parse(&args(&["start"])).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                (true, "prod".to_string(), "8080".to_string()),
                (false, "dev".to_string(), "8080".to_string()),
            ]
        );
    }

    #[test]
    fn listener_receives_the_full_raw_args() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);
        let raw: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&raw);
        cli.add_command_listener(
            "status",
            move |_command: &ParsedCommand, args: &[String]| -> anyhow::Result<()> {
                sink.borrow_mut().extend_from_slice(args);
                Ok(())
            },
        )
        .unwrap();

        let invocation = args(&["--verbose", "status"]);
        cli.parse(&invocation).unwrap();
        assert_eq!(*raw.borrow(), invocation);
    }

    #[test]
    fn repeated_parses_start_from_a_clean_state() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);
        let opened: Rc<RefCell<Vec<bool>>> = Rc::default();
        let sink = Rc::clone(&opened);
        cli.add_command_listener(
            "start",
            move |command: &ParsedCommand, _args: &[String]| -> anyhow::Result<()> {
                sink.borrow_mut().push(command.is_present("open"));
                Ok(())
            },
        )
        .unwrap();

        cli.parse(&args(&["start", "--open"])).unwrap();
        cli.parse(&args(&["start"])).unwrap();
        assert_eq!(*opened.borrow(), vec![true, false]);
    }

    #[test]
    fn no_arguments_prints_info() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);

        assert_eq!(cli.parse(&args(&[])).unwrap(), ParseOutcome::Info);
        let text = output.contents();
        assert!(text.starts_with("fake-cli <command> [<args>...]\n"));
        assert!(text.contains("A fake CLI tool to test against."));
        assert!(text.contains("start"));
        assert!(text.contains("Checks the status."));
    }

    #[test]
    fn fewer_than_two_tokens_prints_info() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);
        assert_eq!(cli.parse(&["prog".to_string()]).unwrap(), ParseOutcome::Info);
        assert_eq!(cli.parse(&[]).unwrap(), ParseOutcome::Info);
    }
}

mod failures {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_command_names_command_and_tool() {
        let mut cli = StrictArgs::new("faketool");
        cli.register_command(CommandConfig::new("fake", "")).unwrap();

        let err = cli.parse(&args(&["nope"])).unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedCommand { .. }));
        assert_eq!(err.code(), ErrorCode::UnrecognizedCommand);
        let message = err.to_string();
        assert!(message.contains("nope"));
        assert!(message.contains("faketool"));
    }

    #[test]
    fn only_global_flags_means_no_command() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);
        let err = cli.parse(&args(&["--verbose"])).unwrap_err();
        assert!(matches!(err, ParseError::NoCommandSpecified { ref tool } if tool == "fake-cli"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn global_flag_failure_stops_before_command_lookup() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);
        let calls = Calls::default();
        cli.add_command_listener("status", recorder(&calls, "status")).unwrap();

        let err = cli.parse(&args(&["status", "-env"])).unwrap_err();
        assert!(matches!(
            err,
            ParseError::GlobalFlags(FlagError::MissingFlagValue(ref flag)) if flag == "-env"
        ));
        assert_eq!(err.exit_code(), 3);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn required_global_flag_missing() {
        let mut cli = StrictArgs::new("t");
        cli.register_global_flag(FlagConfig::value("token", "").required()).unwrap();
        cli.register_command(CommandConfig::new("go", "")).unwrap();

        let err = cli.parse(&args(&["go"])).unwrap_err();
        assert!(matches!(
            err,
            ParseError::GlobalFlags(FlagError::RequiredFlagMissing(ref flag)) if flag == "-token"
        ));
        assert!(cli.parse(&args(&["go", "-token=abc"])).is_ok());
    }

    #[test]
    fn command_failures_are_tagged_with_the_command() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);
        let calls = Calls::default();
        cli.add_command_listener("status", recorder(&calls, "status")).unwrap();
        cli.add_command_listener("start", recorder(&calls, "start")).unwrap();

        let unknown_flag = cli.parse(&args(&["status", "--open"])).unwrap_err();
        assert!(matches!(
            unknown_flag,
            ParseError::Command {
                ref command,
                error: CommandError::UnrecognizedFlag { ref flag, .. },
            } if command == "status" && flag == "--open"
        ));
        assert_eq!(unknown_flag.exit_code(), 4);

        let stray = cli.parse(&args(&["status", "extra"])).unwrap_err();
        assert!(matches!(
            stray,
            ParseError::Command { error: CommandError::UnexpectedPositionalArgs { .. }, .. }
        ));

        let missing_value = cli.parse(&args(&["start", "-port="])).unwrap_err();
        assert!(matches!(
            missing_value,
            ParseError::Command { error: CommandError::Flag(FlagError::MissingFlagValue(_)), .. }
        ));

        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn every_failure_reaches_the_reporter() {
        let reporter = RecordingReporter::default();
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output).with_reporter(reporter.clone());

        let _ = cli.parse(&args(&["--verbose"]));
        let _ = cli.parse(&args(&["nope"]));
        let _ = cli.parse(&args(&["start", "-env"]));
        let _ = cli.parse(&args(&["status", "--bogus"]));
        cli.parse(&args(&["status"])).unwrap();

        assert_eq!(*reporter.0.borrow(), vec![1, 2, 3, 4]);
    }
}

mod notification {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn listeners_run_once_each_in_registration_order() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);
        let calls = Calls::default();
        cli.add_command_listener("status", recorder(&calls, "first")).unwrap();
        cli.add_command_listener("status", recorder(&calls, "second")).unwrap();
        cli.add_command_listener("start", recorder(&calls, "other")).unwrap();

        cli.parse(&args(&["status"])).unwrap();
        assert_eq!(*calls.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn hooks_run_before_listeners() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);
        let calls = Calls::default();
        cli.add_command_listener("status", recorder(&calls, "listener")).unwrap();
        cli.add_hook(recorder(&calls, "hook one"));
        cli.add_hook(recorder(&calls, "hook two"));

        cli.parse(&args(&["status"])).unwrap();
        assert_eq!(*calls.borrow(), vec!["hook one", "hook two", "listener"]);
    }

    #[test]
    fn listener_failure_stops_notification_without_rollback() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);
        let calls = Calls::default();
        cli.add_command_listener("status", recorder(&calls, "before")).unwrap();
        cli.add_command_listener(
            "status",
            |_command: &ParsedCommand, _args: &[String]| -> anyhow::Result<()> {
                anyhow::bail!("server unreachable")
            },
        )
        .unwrap();
        cli.add_command_listener("status", recorder(&calls, "after")).unwrap();

        let err = cli.parse(&args(&["status"])).unwrap_err();
        assert!(matches!(err, ParseError::Listener { ref command, .. } if command == "status"));
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("server unreachable"));
        assert_eq!(*calls.borrow(), vec!["before"]);
    }

    #[test]
    fn hook_failure_skips_listeners() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);
        let calls = Calls::default();
        cli.add_command_listener("status", recorder(&calls, "listener")).unwrap();
        cli.add_hook(|_command: &ParsedCommand, _args: &[String]| -> anyhow::Result<()> {
            anyhow::bail!("not logged in")
        });

        let err = cli.parse(&args(&["status"])).unwrap_err();
        assert!(matches!(err, ParseError::Listener { .. }));
        assert!(calls.borrow().is_empty());
    }
}

mod help {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn help_flag_prints_command_help_instead_of_running_it() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);
        let calls = Calls::default();
        cli.add_command_listener("start", recorder(&calls, "start")).unwrap();
        cli.add_command_listener("help", recorder(&calls, "help")).unwrap();

        let outcome = cli.parse(&args(&["start", "--help", "-port", "1"])).unwrap();
        assert_eq!(outcome, ParseOutcome::Help { command: "start".into() });
        assert_eq!(*calls.borrow(), vec!["help"]);

        let text = output.contents();
        assert!(text.starts_with("fake-cli start <server name> [options...]\n"));
        assert!(text.contains("-port[= ]<value>"));
        assert!(text.contains("--open"));
        assert!(text.contains("--verbose"));
    }

    #[test]
    fn help_flag_still_needs_a_valid_command() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);

        let err = cli.parse(&args(&["--help"])).unwrap_err();
        assert!(matches!(err, ParseError::NoCommandSpecified { .. }));
        let err = cli.parse(&args(&["status", "--help", "--nope"])).unwrap_err();
        assert!(matches!(err, ParseError::Command { .. }));
        assert!(output.contents().is_empty());
    }

    #[test]
    fn help_command_prints_named_command() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);

        let outcome = cli.parse(&args(&["help", "status"])).unwrap();
        assert_eq!(outcome, ParseOutcome::Dispatched { command: "help".into() });
        assert_eq!(
            output.contents().lines().next(),
            Some("fake-cli status [args...] [options...]")
        );
    }

    #[test]
    fn help_command_requires_a_known_command() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output);

        let err = cli.parse(&args(&["help"])).unwrap_err();
        assert!(matches!(err, ParseError::Listener { ref command, .. } if command == "help"));
        assert!(err.to_string().contains("help <commandname>"));

        let err = cli.parse(&args(&["help", "nope"])).unwrap_err();
        assert!(err.to_string().contains("Cannot find command with name 'nope'"));
        assert!(output.contents().is_empty());
    }
}

mod output {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::BufWriter;

    #[test]
    fn buffered_output_is_flushed_after_info() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output).with_output(BufWriter::new(output.clone()));

        assert_eq!(cli.parse(&args(&[])).unwrap(), ParseOutcome::Info);
        assert!(output.contents().starts_with("fake-cli <command> [<args>...]\n"));
    }

    #[test]
    fn buffered_output_is_flushed_after_help() {
        let output = SharedBuffer::default();
        let mut cli = fake_cli(&output).with_output(BufWriter::new(output.clone()));

        cli.parse(&args(&["help", "status"])).unwrap();
        assert_eq!(
            output.contents().lines().next(),
            Some("fake-cli status [args...] [options...]")
        );
    }

    #[test]
    fn debug_lists_declarations() {
        let output = SharedBuffer::default();
        let text = format!("{:?}", fake_cli(&output));

        assert!(text.starts_with("StrictArgs { name: \"fake-cli\""));
        assert!(text.contains("commands: [\"help\", \"start\", \"status\"]"));
        assert!(text.contains("global_flags: [\"help\", \"verbose\", \"env\"]"));
    }
}
