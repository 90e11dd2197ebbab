use clap::{value_parser, crate_version, Arg, ArgAction, Command, ValueHint};

const IN_HELP: &str = "program text is read from stdin, if stdin is the console, line entry is started";
const CONFIG_LONG_HELP: &str = "JSON string with settings, e.g., `{\"flag\":{\"caseSensitive\":\"warn\"}}`.
Recognized keys are flag.caseSensitive, flag.immediateMode, flag.illegalNames, flag.badReferences,
warn.length, detokenizer.escapes, detokenizer.maxLines, detokenizer.maxLineLength.
Severity values are ignore, hint, info, warn, error.";

fn file_arg(help: &'static str, req: bool) -> Arg {
    Arg::new("file").short('f').long("file").value_name("PATH").help(help)
        .required(req)
        .value_hint(ValueHint::FilePath)
}

fn config_arg() -> Arg {
    Arg::new("config").long("config").short('c').value_name("JSON").help("modify settings")
        .long_help(CONFIG_LONG_HELP)
        .required(false)
        .default_value("{}")
}

fn console_arg() -> Arg {
    Arg::new("console").long("console").help("format for console unconditionally")
        .required(false)
        .action(ArgAction::SetTrue)
        .long_help("even if the output context is a file or pipe, format it for the console")
}

fn indent_arg() -> Arg {
    Arg::new("indent").long("indent").help("JSON indentation, omit to minify")
        .value_name("SPACES")
        .value_parser(value_parser!(u16).range(0..16))
        .required(false)
}

pub fn build_cli() -> Command {
    let long_help = "integerbasic is always invoked with exactly one of several subcommands.
The subcommands are generally designed to function as nodes in a pipeline.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
line entry:            `integerbasic verify`
file check:            `integerbasic verify < myprog.bas`
syntax trees:          `integerbasic parse < myprog.bas`
tokenize to file:      `integerbasic tokenize < myprog.bas > myprog.itok`
detokenize from file:  `integerbasic detokenize < myprog.itok`
round trip:            `integerbasic tok < myprog.bas | integerbasic dtok`
run corpus tests:      `integerbasic corpus run -f test/corpus/statements.txt`";

    let mut main_cmd = Command::new("integerbasic")
        .about("Parses, checks, and tokenizes Apple II Integer BASIC.")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(
        Command::new("verify")
            .arg(Arg::new("sexpr").long("sexpr").short('s').help("write S-expressions to stderr").action(ArgAction::SetTrue))
            .arg(config_arg())
            .about("read from stdin and perform language analysis")
            .after_help(IN_HELP),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("parse")
            .arg(Arg::new("highlights").long("highlights").help("list highlight captures instead of trees").action(ArgAction::SetTrue))
            .about("read from stdin, write syntax trees to stdout")
            .after_help(IN_HELP),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("tokenize")
            .arg(console_arg())
            .visible_alias("tok")
            .about("read from stdin, tokenize, write to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("detokenize")
            .arg(config_arg())
            .visible_alias("dtok")
            .about("read from stdin, detokenize, write to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("tokens")
            .arg(indent_arg())
            .about("write the ROM token table as JSON to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("node-types")
            .arg(indent_arg())
            .about("write the node types as JSON to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("highlights")
            .about("write the highlight query to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("corpus")
            .subcommand_required(true)
            .subcommand(
                Command::new("run")
                    .arg(file_arg("corpus file to run", true).action(ArgAction::Append))
                    .about("run corpus tests, report failures to stderr")
            )
            .subcommand(
                Command::new("generate")
                    .arg(Arg::new("kind").short('k').long("kind").value_name("KIND").help("which corpus to generate")
                        .required(true)
                        .value_parser(["vars-legal","vars-illegal"])
                    )
                    .about("write a generated corpus to stdout")
            )
            .about("run or generate tree-sitter style corpus tests"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("completions")
            .arg(
                Arg::new("shell").short('s').long("shell").help("shell target").value_name("NAME")
                    .required(true)
                    .value_parser(["bash","elv","fish","ps1","zsh"])
            )
            .about("write completions script to stdout for the specified shell")
    );
    return main_cmd;
}
