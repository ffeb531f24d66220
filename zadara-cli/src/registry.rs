//! Data-driven command registry.
//!
//! Every `zadarapy <command> <subcommand>` pair is one [`CommandSpec`]. The
//! clap tree is generated from the registry, and dispatch looks the parsed
//! pair back up in it.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Args, Command, value_parser};
use zadara_client::{ApiResponse, CallOptions, ClientError, DEFAULT_TIMEOUT_SECS, Session, YesNo};

/// Future returned by a command handler.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<ApiResponse>> + 'a>>;

/// Runs one subcommand against a session.
pub type Handler = for<'a> fn(&'a Session, &'a Params) -> HandlerFuture<'a>;

/// Builds a [`Handler`] from an expression evaluating to an `ApiResponse`.
///
/// The expression may use `?` and `.await`.
macro_rules! handler {
    (|$session:ident, $params:ident| $body:expr) => {{
        async fn call(
            $session: &zadara_client::Session,
            $params: &$crate::registry::Params,
        ) -> anyhow::Result<zadara_client::ApiResponse> {
            Ok($body)
        }
        fn boxed<'a>(
            session: &'a zadara_client::Session,
            params: &'a $crate::registry::Params,
        ) -> $crate::registry::HandlerFuture<'a> {
            Box::pin(call(session, params))
        }
        boxed as $crate::registry::Handler
    }};
}
pub(crate) use handler;

/// How a command argument is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Free text.
    Text,
    /// Non-negative integer.
    Int,
    /// Boolean switch.
    Flag,
    /// `YES` or `NO`, case-insensitive.
    YesNo,
    /// One of a fixed set of values, case-insensitive.
    Choice(&'static [&'static str]),
}

/// One `--name` argument of a subcommand.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<&'static str>,
}

impl ParamSpec {
    fn new(name: &'static str, kind: ParamKind, help: &'static str) -> Self {
        Self {
            name,
            help,
            kind,
            required: false,
            default: None,
        }
    }

    pub fn text(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::Text, help)
    }

    pub fn int(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::Int, help)
    }

    pub fn flag(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::Flag, help)
    }

    pub fn yes_no(name: &'static str, help: &'static str) -> Self {
        Self::new(name, ParamKind::YesNo, help)
    }

    pub fn choice(name: &'static str, values: &'static [&'static str], help: &'static str) -> Self {
        Self::new(name, ParamKind::Choice(values), help)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name)
            .long(self.name)
            .help(self.help)
            .required(self.required)
            .help_heading("Command Arguments");

        let arg = match self.kind {
            ParamKind::Text => arg.action(ArgAction::Set),
            ParamKind::Int => arg.value_parser(value_parser!(u64)),
            ParamKind::Flag => arg.action(ArgAction::SetTrue),
            ParamKind::YesNo => arg
                .value_parser(PossibleValuesParser::new(["YES", "NO"]))
                .ignore_case(true),
            ParamKind::Choice(values) => arg
                .value_parser(PossibleValuesParser::new(values.iter().copied()))
                .ignore_case(true),
        };

        match self.default {
            Some(value) => arg.default_value(value),
            None => arg,
        }
    }
}

/// `--start`, shared by every listing.
pub fn start() -> ParamSpec {
    ParamSpec::int(
        "start",
        "The offset to start displaying records from. Used with --limit for paging.",
    )
}

/// `--limit`, shared by every listing.
pub fn limit() -> ParamSpec {
    ParamSpec::int(
        "limit",
        "The maximum number of records to return. Used with --start for paging.",
    )
}

/// `--interval`, shared by the performance commands.
pub fn interval() -> ParamSpec {
    ParamSpec::int("interval", "The interval in seconds to collect statistics for.").default("1")
}

/// `--force`, shared by the destructive commands.
pub fn force() -> ParamSpec {
    ParamSpec::yes_no("force", "If set to YES, forces the operation.").default("NO")
}

/// A registered subcommand.
pub struct CommandSpec {
    pub command: &'static str,
    pub subcommand: &'static str,
    pub about: &'static str,
    pub params: Vec<ParamSpec>,
    /// Key of the data to display, looked up under `response` first.
    /// `None` means the command only reports success.
    pub return_key: Option<&'static str>,
    pub handler: Handler,
}

impl CommandSpec {
    fn to_command(&self) -> Command {
        self.params
            .iter()
            .fold(Command::new(self.subcommand).about(self.about), |cmd, param| {
                cmd.arg(param.to_arg())
            })
    }
}

/// Top-level command groups and their help text, in display order.
pub struct CommandGroup {
    pub name: &'static str,
    pub about: &'static str,
}

/// Connection, display and general arguments accepted by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// INI file with connection values. Defaults to ~/.zadarapy
    #[arg(short = 'c', long = "api-configfile", value_name = "PATH", global = true, help_heading = "Connection Arguments")]
    pub configfile: Option<PathBuf>,

    /// API hostname. Alternatively set ZADARA_HOST or use a configuration file
    #[arg(short = 'H', long = "api-hostname", value_name = "HOST", global = true, help_heading = "Connection Arguments")]
    pub host: Option<String>,

    /// Use clear-text HTTP instead of HTTPS
    #[arg(short = 'i', long, global = true, help_heading = "Connection Arguments")]
    pub insecure: bool,

    /// API key. Alternatively set ZADARA_KEY or use a configuration file
    #[arg(short = 'k', long = "api-key", value_name = "KEY", global = true, help_heading = "Connection Arguments")]
    pub key: Option<String>,

    /// API port. Alternatively set ZADARA_PORT or use a configuration file
    #[arg(short = 'p', long = "api-port", value_name = "PORT", global = true, help_heading = "Connection Arguments")]
    pub port: Option<u32>,

    /// Print the JSON response instead of tables
    #[arg(short = 'j', long, global = true, help_heading = "Display Arguments")]
    pub json: bool,

    /// Comma separated field names to display, e.g. display_name,pool_name
    #[arg(short = 'r', long = "return-fields", value_name = "FIELDS", global = true, help_heading = "Display Arguments")]
    pub return_fields: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true, help_heading = "Display Arguments")]
    pub verbose: u8,

    /// One table per record, for wide output
    #[arg(short = 'V', long, global = true, help_heading = "Display Arguments")]
    pub vertical: bool,

    /// API command timeout in seconds
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = check_positive, global = true, help_heading = "General Arguments")]
    pub timeout: u64,
}

impl GlobalArgs {
    /// Builds the session from the connection arguments. Anything not given
    /// here falls back to the environment and the configuration file.
    pub fn session(&self) -> zadara_client::Result<Session> {
        let mut builder = Session::builder().default_timeout(self.timeout);
        if let Some(host) = &self.host {
            builder = builder.host(host);
        }
        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(key) = &self.key {
            builder = builder.key(key);
        }
        if self.insecure {
            builder = builder.secure(false);
        }
        if let Some(path) = &self.configfile {
            builder = builder.config_file(path);
        }
        builder.build()
    }

    /// Field names given with `--return-fields`.
    pub fn fields(&self) -> Option<Vec<String>> {
        self.return_fields.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(String::from)
                .collect()
        })
    }
}

/// Accepts only integers greater than zero.
pub fn check_positive(value: &str) -> std::result::Result<u64, String> {
    match value.trim().parse::<i64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed.unsigned_abs()),
        _ => Err(format!("{value} is an invalid positive int value")),
    }
}

/// Builds the full clap tree from the registry.
pub fn build_cli(groups: &[CommandGroup], specs: &[CommandSpec]) -> Command {
    let root = Command::new("zadarapy")
        .about(
            "Runs commands against a Zadara VPSA or VPSA Object Storage via the REST API",
        )
        .version(env!("CARGO_PKG_VERSION"))
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .long("version")
                .action(ArgAction::Version)
                .help("Print version"),
        )
        .subcommand_required(true)
        .arg_required_else_help(true);

    let root = GlobalArgs::augment_args(root);

    groups.iter().fold(root, |root, group| {
        let command = specs
            .iter()
            .filter(|spec| spec.command == group.name)
            .fold(
                Command::new(group.name)
                    .about(group.about)
                    .subcommand_required(true)
                    .arg_required_else_help(true),
                |command, spec| command.subcommand(spec.to_command()),
            );
        root.subcommand(command)
    })
}

/// Finds the spec for a parsed `command subcommand` pair.
pub fn find<'a>(specs: &'a [CommandSpec], command: &str, subcommand: &str) -> Option<&'a CommandSpec> {
    specs
        .iter()
        .find(|spec| spec.command == command && spec.subcommand == subcommand)
}

/// Parsed subcommand arguments plus the per-call options.
#[derive(Debug, Clone)]
pub struct Params {
    matches: ArgMatches,
    options: CallOptions,
}

impl Params {
    pub fn new(matches: ArgMatches, options: CallOptions) -> Self {
        Self { matches, options }
    }

    pub fn options(&self) -> &CallOptions {
        &self.options
    }

    pub fn opt_text(&self, name: &str) -> Option<&str> {
        self.matches
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .map(String::as_str)
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        self.opt_text(name)
            .with_context(|| format!("--{name} is required"))
    }

    pub fn flag(&self, name: &str) -> bool {
        self.matches
            .try_get_one::<bool>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    pub fn opt_u64(&self, name: &str) -> Option<u64> {
        self.matches.try_get_one::<u64>(name).ok().flatten().copied()
    }

    pub fn u64(&self, name: &str) -> Result<u64> {
        self.opt_u64(name)
            .with_context(|| format!("--{name} is required"))
    }

    pub fn opt_u32(&self, name: &str) -> Result<Option<u32>> {
        self.opt_u64(name)
            .map(|value| {
                u32::try_from(value).map_err(|_| {
                    ClientError::Validation(format!("{value} is too large for --{name}"))
                })
            })
            .transpose()
            .map_err(Into::into)
    }

    pub fn u32(&self, name: &str) -> Result<u32> {
        self.opt_u32(name)?
            .with_context(|| format!("--{name} is required"))
    }

    /// Parses a text argument with the library's own `FromStr`, so bad
    /// values surface as parameter errors.
    pub fn parse<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr<Err = ClientError>,
    {
        Ok(self.text(name)?.parse::<T>()?)
    }

    pub fn yes_no(&self, name: &str) -> Result<YesNo> {
        self.parse(name)
    }

    pub fn start(&self) -> Result<Option<u32>> {
        self.opt_u32("start")
    }

    pub fn limit(&self) -> Result<Option<u32>> {
        self.opt_u32("limit")
    }

    /// Decodes a JSON argument.
    pub fn json<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        self.opt_text(name)
            .map(|raw| serde_json::from_str::<T>(raw).map_err(ClientError::from))
            .transpose()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::FromArgMatches;

    fn sample_specs() -> Vec<CommandSpec> {
        vec![CommandSpec {
            command: "drives",
            subcommand: "get",
            about: "Displays details for a single drive",
            params: vec![
                ParamSpec::text("drive-id", "The drive ID").required(),
                force(),
                start(),
                ParamSpec::flag("dry", "Only print"),
            ],
            return_key: Some("disk"),
            handler: handler!(|session, params| {
                session.get_drive(params.text("drive-id")?, params.options()).await?
            }),
        }]
    }

    fn groups() -> Vec<CommandGroup> {
        vec![CommandGroup {
            name: "drives",
            about: "Commands related to individual drives",
        }]
    }

    fn parse(args: &[&str]) -> std::result::Result<ArgMatches, clap::Error> {
        build_cli(&groups(), &sample_specs()).try_get_matches_from(args)
    }

    #[test]
    fn test_check_positive() {
        assert_eq!(check_positive("15"), Ok(15));
        assert_eq!(
            check_positive("-5"),
            Err("-5 is an invalid positive int value".to_string())
        );
        assert!(check_positive("0").is_err());
        assert!(check_positive("abc").is_err());
    }

    #[test]
    fn test_negative_timeout_rejected_by_parser() {
        let result = parse(&["zadarapy", "drives", "get", "--drive-id", "volume-00000001", "-t", "-5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let matches = parse(&[
            "zadarapy",
            "drives",
            "get",
            "--drive-id",
            "volume-00000001",
            "-H",
            "vpsa.example.com",
            "-k",
            "SECRET",
            "-i",
            "-vv",
            "-r",
            "name, status",
        ])
        .unwrap();

        let globals = GlobalArgs::from_arg_matches(&matches).unwrap();
        assert_eq!(globals.host.as_deref(), Some("vpsa.example.com"));
        assert_eq!(globals.key.as_deref(), Some("SECRET"));
        assert!(globals.insecure);
        assert_eq!(globals.verbose, 2);
        assert_eq!(globals.timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(
            globals.fields(),
            Some(vec!["name".to_string(), "status".to_string()])
        );
    }

    #[test]
    fn test_params_accessors() {
        let matches = parse(&[
            "zadarapy",
            "drives",
            "get",
            "--drive-id",
            "volume-00000001",
            "--force",
            "yes",
            "--start",
            "20",
            "--dry",
        ])
        .unwrap();

        let (_, group) = matches.subcommand().unwrap();
        let (_, args) = group.subcommand().unwrap();
        let params = Params::new(args.clone(), CallOptions::default());

        assert_eq!(params.text("drive-id").unwrap(), "volume-00000001");
        assert_eq!(params.yes_no("force").unwrap(), YesNo::Yes);
        assert_eq!(params.start().unwrap(), Some(20));
        assert_eq!(params.limit().unwrap(), None);
        assert!(params.flag("dry"));
        assert!(params.opt_text("unknown").is_none());
    }

    #[test]
    fn test_required_param_enforced() {
        assert!(parse(&["zadarapy", "drives", "get"]).is_err());
    }

    #[test]
    fn test_find() {
        let specs = sample_specs();
        assert!(find(&specs, "drives", "get").is_some());
        assert!(find(&specs, "drives", "list").is_none());
    }
}
