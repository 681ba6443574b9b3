use clap::{Args, Parser, Subcommand};
use eyre::{eyre, Result, WrapErr};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, Level};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

use optuple_core::{pattern, Opt, OptionError, SeqExt};

#[derive(Parser)]
#[command(name = "optuple")]
#[command(about = "Query JSON Lines sequences as optional values")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the first (matching) value
    First(QueryArgs),
    /// Print the last (matching) value
    Last(QueryArgs),
    /// Print the only (matching) value, absent if there are several
    Single(QueryArgs),
    /// Stream the non-null values, one per line
    Values {
        /// Input file, stdin when omitted
        input: Option<PathBuf>,
    },
    /// Print every value as a list, absent if any value is null
    ListAll {
        /// Input file, stdin when omitted
        input: Option<PathBuf>,
    },
    /// Extract a capture group from each input line
    Extract {
        /// Regular expression to match against each line
        #[arg(short, long)]
        pattern: String,

        /// Capture group index or name
        #[arg(short, long, default_value = "0")]
        group: String,

        /// Only print lines where the group matched
        #[arg(long)]
        present: bool,

        /// Input file, stdin when omitted
        input: Option<PathBuf>,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Predicate such as '>100', '<=2.5', '==ok' or '!=none'
    #[arg(long = "where", value_name = "PREDICATE")]
    predicate: Option<String>,

    /// Input file, stdin when omitted
    input: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Selection {
    First,
    Last,
    Single,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::First(args) => print_selection(&mut out, args, Selection::First)?,
        Commands::Last(args) => print_selection(&mut out, args, Selection::Last)?,
        Commands::Single(args) => print_selection(&mut out, args, Selection::Single)?,
        Commands::Values { input } => {
            let count = stream_values(&mut out, open_input(input.as_ref())?)?;
            info!(count, "streamed present values");
        }
        Commands::ListAll { input } => {
            let listed = scan(options(open_input(input.as_ref())?), |items| items.list_all())?;
            info!(present = listed.is_some(), "collected list");
            writeln!(out, "{}", serde_json::to_string(&listed)?)?;
        }
        Commands::Extract {
            pattern,
            group,
            present,
            input,
        } => {
            let regex = Regex::new(pattern).wrap_err("Invalid --pattern")?;
            let group = GroupRef::parse(&regex, group).wrap_err("Invalid --group")?;
            extract_lines(&mut out, &regex, &group, *present, open_input(input.as_ref())?)?;
        }
    }

    Ok(())
}

fn install_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(
            Targets::new()
                .with_target("optuple", level)
                .with_target("optuple_core", level),
        );

    tracing_subscriber::registry().with(fmt_layer).init();
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "reading input");
            let file = File::open(path)
                .wrap_err_with(|| format!("Cannot open input {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            info!("reading input from stdin");
            Ok(Box::new(BufReader::new(io::stdin())))
        }
    }
}

/// Lazily parsed JSON Lines, skipping blank lines
struct JsonLines<R> {
    lines: io::Lines<R>,
    line_no: usize,
}

fn json_lines<R: BufRead>(reader: R) -> JsonLines<R> {
    JsonLines {
        lines: reader.lines(),
        line_no: 0,
    }
}

impl<R: BufRead> Iterator for JsonLines<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Result<Value>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let line_no = self.line_no;
            debug!(line_no, "parsing line");
            return Some(
                serde_json::from_str(&line)
                    .wrap_err_with(|| format!("Invalid JSON on line {}", line_no)),
            );
        }
    }
}

/// JSON Lines where `null` means absent
fn options<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Opt<Value>>> {
    json_lines(reader).map(|line| line.map(|v| Opt::none_when(v, Value::is_null)))
}

/// Run `query` over the successfully parsed items.
///
/// The first parse error ends the sequence and is returned instead of the
/// query result. Items after it are never read.
fn scan<T, R>(
    items: impl Iterator<Item = Result<T>>,
    query: impl FnOnce(&mut dyn Iterator<Item = T>) -> R,
) -> Result<R> {
    let mut error = None;
    let mut parsed = items.map_while(|item| match item {
        Ok(v) => Some(v),
        Err(e) => {
            error = Some(e);
            None
        }
    });
    let result = query(&mut parsed);
    drop(parsed);

    match error {
        Some(e) => Err(e),
        None => Ok(result),
    }
}

fn select(args: &QueryArgs, selection: Selection) -> Result<Opt<Value>> {
    let predicate = args
        .predicate
        .as_deref()
        .map(|p| p.parse::<Predicate>())
        .transpose()?;
    debug!(?selection, ?predicate, "selecting");

    let reader = open_input(args.input.as_ref())?;
    scan(json_lines(reader), |items| match (selection, predicate) {
        (Selection::First, None) => items.first_or_none(),
        (Selection::First, Some(p)) => items.first_or_none_by(|v| p.test(v)),
        (Selection::Last, None) => items.last_or_none(),
        (Selection::Last, Some(p)) => items.last_or_none_by(|v| p.test(v)),
        (Selection::Single, None) => items.single_or_none(),
        (Selection::Single, Some(p)) => items.single_or_none_by(|v| p.test(v)),
    })
}

fn print_selection(out: &mut impl Write, args: &QueryArgs, selection: Selection) -> Result<()> {
    let selected = select(args, selection)?;
    info!(present = selected.is_some(), "selection done");
    writeln!(out, "{}", serde_json::to_string(&selected)?)?;
    Ok(())
}

fn stream_values<R: BufRead>(out: &mut impl Write, reader: R) -> Result<usize> {
    let written = scan(options(reader), |items| -> io::Result<usize> {
        let mut count = 0;
        for value in items.values() {
            writeln!(out, "{}", value)?;
            count += 1;
        }
        Ok(count)
    })?;
    Ok(written?)
}

#[derive(Debug, Clone, PartialEq)]
enum GroupRef {
    Index(usize),
    Name(String),
}

impl GroupRef {
    /// Resolve `s` against `regex`, rejecting groups the pattern does not have
    fn parse(regex: &Regex, s: &str) -> Result<Self> {
        let group = match s.parse::<usize>() {
            Ok(index) => {
                pattern::check_index(regex, index)?;
                GroupRef::Index(index)
            }
            Err(_) => {
                pattern::check_name(regex, s)?;
                GroupRef::Name(s.to_string())
            }
        };
        debug!(?group, "resolved capture group");
        Ok(group)
    }
}

fn extract_group(regex: &Regex, group: &GroupRef, line: &str) -> Result<Opt<String>> {
    let matched = match Opt::from_nullable(regex.captures(line)) {
        Opt::Present(captures) => match group {
            GroupRef::Index(index) => pattern::group(&captures, *index)?,
            GroupRef::Name(name) => pattern::named(regex, &captures, name)?,
        },
        Opt::Absent => Opt::Absent,
    };
    Ok(matched.map(|m| m.as_str().to_string()))
}

fn extract_lines<R: BufRead>(
    out: &mut impl Write,
    regex: &Regex,
    group: &GroupRef,
    present_only: bool,
    reader: R,
) -> Result<()> {
    let mut matched = 0usize;
    for line in reader.lines() {
        let extracted = extract_group(regex, group, &line?)?;
        matched += extracted.count();
        match extracted {
            Opt::Present(text) => writeln!(out, "{}", Value::String(text))?,
            Opt::Absent if !present_only => writeln!(out, "null")?,
            Opt::Absent => {}
        }
    }
    info!(matched, "extraction done");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Lt => ordering == Ordering::Less,
            Op::Le => ordering != Ordering::Greater,
            Op::Gt => ordering == Ordering::Greater,
            Op::Ge => ordering != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Number(f64),
    Text(String),
}

/// Comparison of a JSON value against a literal
#[derive(Debug, Clone, PartialEq)]
struct Predicate {
    op: Op,
    literal: Literal,
}

impl FromStr for Predicate {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        // Two-character operators first so '>=' is not read as '>'
        const OPS: [(&str, Op); 6] = [
            (">=", Op::Ge),
            ("<=", Op::Le),
            ("==", Op::Eq),
            ("!=", Op::Ne),
            (">", Op::Gt),
            ("<", Op::Lt),
        ];

        let s = s.trim();
        let (op, rest) = OPS
            .iter()
            .find_map(|(prefix, op)| s.strip_prefix(prefix).map(|rest| (*op, rest)))
            .ok_or_else(|| eyre!("Predicate '{}' must start with one of == != < <= > >=", s))?;

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(eyre!("Predicate '{}' has no value to compare with", s));
        }

        let literal = match rest.parse::<f64>() {
            Ok(n) => Literal::Number(n),
            Err(_) => Literal::Text(rest.trim_matches('"').to_string()),
        };
        Ok(Predicate { op, literal })
    }
}

impl Predicate {
    /// Values of a different JSON type never match
    fn test(&self, value: &Value) -> bool {
        let ordering = match &self.literal {
            Literal::Number(n) => Opt::from_nullable(value.as_f64())
                .bind(|v| Opt::from_nullable(v.partial_cmp(n))),
            Literal::Text(t) => {
                Opt::from_nullable(value.as_str()).map(|v| v.cmp(t.as_str()))
            }
        };
        ordering.exists(|o| self.op.accepts(*o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_predicates() {
        let p: Predicate = ">=500".parse().unwrap();
        assert_eq!(p.op, Op::Ge);
        assert_eq!(p.literal, Literal::Number(500.0));

        let p: Predicate = "== \"ok\"".parse().unwrap();
        assert_eq!(p.literal, Literal::Text("ok".to_string()));

        assert!("~5".parse::<Predicate>().is_err());
        assert!("<=".parse::<Predicate>().is_err());
    }

    #[test]
    fn predicates_only_match_their_json_type() {
        let gt: Predicate = ">100".parse().unwrap();
        assert!(gt.test(&json!(123)));
        assert!(!gt.test(&json!(99.5)));
        assert!(!gt.test(&json!("123")));

        let ne: Predicate = "!=none".parse().unwrap();
        assert!(ne.test(&json!("some")));
        assert!(!ne.test(&json!(null)));
    }

    #[test]
    fn selects_from_json_lines() {
        let input = "123\n\n456\n789\n";
        let items = || json_lines(input.as_bytes());

        let first = scan(items(), |it| it.first_or_none_by(|v| v.as_i64() > Some(200))).unwrap();
        assert_eq!(first, Opt::Present(json!(456)));

        let single = scan(items(), |it| it.single_or_none()).unwrap();
        assert_eq!(single, Opt::Absent);
    }

    #[test]
    fn first_stops_before_malformed_lines() {
        let input = "1\n2\nnot json\n";
        let first = scan(json_lines(input.as_bytes()), |it| it.first_or_none()).unwrap();
        assert_eq!(first, Opt::Present(json!(1)));

        let last = scan(json_lines(input.as_bytes()), |it| it.last_or_none());
        assert!(last.is_err());
    }

    #[test]
    fn list_all_stops_at_null() {
        let listed = scan(options("1\n2\n".as_bytes()), |it| it.list_all()).unwrap();
        assert_eq!(listed, Opt::Present(vec![json!(1), json!(2)]));

        let listed = scan(options("1\nnull\nnot json\n".as_bytes()), |it| it.list_all()).unwrap();
        assert_eq!(listed, Opt::Absent);
    }

    #[test]
    fn streams_values() {
        let mut out = Vec::new();
        let count = stream_values(&mut out, "1\nnull\n\"x\"\n".as_bytes()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "1\n\"x\"\n");
    }

    #[test]
    fn extracts_named_groups() {
        let regex = Regex::new(r"code=(?P<code>\d+)").unwrap();
        let group = GroupRef::parse(&regex, "code").unwrap();
        let mut out = Vec::new();
        extract_lines(&mut out, &regex, &group, false, "a code=7\nnothing\n".as_bytes()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\"7\"\nnull\n");

        assert_eq!(GroupRef::parse(&regex, "1").unwrap(), GroupRef::Index(1));
    }

    #[test]
    fn rejects_unknown_groups_before_reading_input() {
        let regex = Regex::new(r"code=(?P<code>\d+)").unwrap();

        for group in ["missing", "2"] {
            let err = GroupRef::parse(&regex, group).unwrap_err();
            let cause = err.downcast_ref::<OptionError>();
            assert!(
                matches!(cause, Some(OptionError::InvalidArgument { .. })),
                "group {} should be an invalid argument, got {:?}",
                group,
                err
            );
        }
    }
}
