use std::io::{self, stdin, stdout, BufRead, Write};

use clap::{App, Arg, ArgMatches};
use liner::{Context, EmptyCompleter, Prompt};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use scicalc::keypad::{self, Button, Style, LAYOUT};
use scicalc::{Key, Session, Surface};

const PROMPT: &str = "[]> ";

/// Environment variable holding the log filter, e.g. `SCICALC_LOG=debug`.
const LOG_ENV: &str = "SCICALC_LOG";

/// ASCII spellings for buttons whose labels are awkward to type.
const ALIASES: &[(&str, &str)] = &[
    ("fact", "x!"),
    ("pi", "π"),
    ("sqrt", "√"),
    ("cbrt", "∛"),
    ("neg", "±"),
    ("pow", "xⁿ"),
    ("root", "ⁿ√"),
    ("inv", "x⁻¹"),
    ("exp", "eˣ"),
    ("del", "DEL"),
    ("ac", "AC"),
];

/// The terminal stand-in for the calculator window.
struct Terminal {
    display: String,
    interactive: bool,
}

impl Surface for Terminal {
    fn refresh(&mut self, display: &str) {
        self.display.clear();
        self.display.push_str(display);
    }

    fn alert(&mut self, message: &str) {
        eprintln!("Error: {}", message);
        if self.interactive {
            eprint!("(press Enter to dismiss) ");
            let dismissed = io::stderr()
                .flush()
                .and_then(|()| stdin().lock().read_line(&mut String::new()));
            match dismissed {
                Ok(0) => debug!("input closed before the alert was dismissed"),
                Ok(_) => (),
                Err(e) => debug!("alert not dismissed: {}", e),
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Close,
    History,
    Input,
}

fn lookup(word: &str) -> Option<&'static Button> {
    keypad::find(word).or_else(|| {
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == word)
            .and_then(|(_, label)| keypad::find(label))
    })
}

/// Feed one line of input to the session. Words naming a button press it;
/// anything else is typed key by key. The Enter that ended the line counts
/// as the Enter key only when the last word was typed, so `16 sqrt` shows
/// `4.0` without also evaluating it.
fn feed<S: Surface>(session: &mut Session<S>, line: &str) -> Command {
    match line.trim() {
        "exit" | "quit" => return Command::Close,
        "history" => return Command::History,
        _ => (),
    }
    let mut typed = false;
    for word in line.split_whitespace() {
        match lookup(word) {
            Some(button) => {
                session.perform(button.action);
                typed = false;
            }
            None => {
                for c in word.chars() {
                    typed |= session.press_key(Key::Char(c));
                }
            }
        }
    }
    if typed {
        session.press_key(Key::Enter);
    }
    Command::Input
}

fn render<W: Write>(out: &mut W, display: &str, interactive: bool) -> io::Result<()> {
    if interactive {
        writeln!(out, "[{:>30}]", display)
    } else {
        writeln!(out, "{}", display)
    }
}

fn print_history<W: Write, S: Surface>(out: &mut W, session: &Session<S>) -> io::Result<()> {
    for entry in session.history() {
        writeln!(out, "{}", entry)?;
    }
    Ok(())
}

fn print_buttons<W: Write>(out: &mut W) -> io::Result<()> {
    for row in LAYOUT.iter() {
        for button in row.iter() {
            let cell = match button.style {
                Style::Equals => format!("[{:^13}]", button.label),
                Style::Control | Style::Operator => format!("<{:^5}>", button.label),
                Style::Function | Style::Digit => format!("[{:^5}]", button.label),
            };
            write!(out, "{} ", cell)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn interactive_loop<W: Write>(out: &mut W, session: &mut Session<Terminal>) -> io::Result<()> {
    let mut con = Context::new();
    loop {
        render(out, &session.surface().display, true)?;
        let line = match con.read_line(Prompt::from(PROMPT), None, &mut EmptyCompleter) {
            Ok(line) => line,
            Err(ref e)
                if e.kind() == io::ErrorKind::Interrupted
                    || e.kind() == io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e),
        };
        match feed(session, &line) {
            Command::Close => break,
            Command::History => print_history(out, session)?,
            Command::Input => (),
        }
        if !line.trim().is_empty() {
            con.history.push(line.into())?;
        }
    }
    Ok(())
}

fn scripted_loop<W: Write>(out: &mut W, session: &mut Session<Terminal>) -> io::Result<()> {
    let stdin = stdin();
    for line in stdin.lock().lines() {
        match feed(session, &line?) {
            Command::Close => break,
            Command::History => print_history(out, session)?,
            Command::Input => render(out, &session.surface().display, false)?,
        }
    }
    Ok(())
}

pub fn calc(matches: &ArgMatches) -> io::Result<()> {
    let stdout = stdout();
    let mut stdout = stdout.lock();

    if matches.is_present("buttons") {
        return print_buttons(&mut stdout);
    }

    let inputs: Vec<&str> = matches.values_of("INPUT").map(|v| v.collect()).unwrap_or_default();
    let interactive = inputs.is_empty() && atty::is(atty::Stream::Stdin);
    let mut session = Session::new(Terminal {
        display: String::new(),
        interactive,
    });
    debug!("window opened, interactive: {}", interactive);

    if !inputs.is_empty() {
        feed(&mut session, &inputs.join(" "));
        render(&mut stdout, &session.surface().display, false)?;
    } else if interactive {
        interactive_loop(&mut stdout, &mut session)?;
    } else {
        scripted_loop(&mut stdout, &mut session)?;
    }

    if matches.is_present("history") {
        print_history(&mut stdout, &session)?;
    }
    info!("window closed after {} evaluations", session.history().len());
    stdout.flush()
}

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let matches = App::new("scicalc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scientific calculator: type keys or button labels, one line at a time")
        .arg(
            Arg::with_name("history")
                .short("H")
                .long("history")
                .help("Print the evaluation history when the calculator closes"),
        )
        .arg(
            Arg::with_name("buttons")
                .short("b")
                .long("buttons")
                .help("Print the button grid and exit"),
        )
        .arg(
            Arg::with_name("INPUT")
                .multiple(true)
                .help("Keys and button labels to feed as a single line"),
        )
        .get_matches();

    // Failures never change the exit status.
    if let Err(e) = calc(&matches) {
        eprintln!("scicalc: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal() -> Session<Terminal> {
        Session::new(Terminal {
            display: String::new(),
            interactive: false,
        })
    }

    #[test]
    fn typed_lines_evaluate() {
        let mut session = terminal();
        assert_eq!(feed(&mut session, "2*3"), Command::Input);
        assert_eq!(session.surface().display, "6");
        assert_eq!(session.history().len(), 1);

        assert_eq!(feed(&mut session, "AC 2 pow 10"), Command::Input);
        assert_eq!(session.surface().display, "1024");
        assert_eq!(session.history()[1].to_string(), "2**10 = 1024");
    }

    #[test]
    fn trailing_button_is_not_evaluated() {
        let mut session = terminal();
        feed(&mut session, "9 sqrt");
        assert_eq!(session.surface().display, "3.0");
        feed(&mut session, "AC 170 fact");
        assert!(session.surface().display.starts_with("72574156153079989673"));
        assert!(session.history().is_empty());
    }

    #[test]
    fn commands_and_aliases() {
        let mut session = terminal();
        assert_eq!(feed(&mut session, " exit "), Command::Close);
        assert_eq!(feed(&mut session, "quit"), Command::Close);
        assert_eq!(feed(&mut session, "history"), Command::History);
        assert_eq!(feed(&mut session, ""), Command::Input);
        assert!(session.history().is_empty());

        assert_eq!(lookup("sqrt"), keypad::find("√"));
        assert_eq!(lookup("sin"), keypad::find("sin"));
        assert_eq!(lookup("sine"), None);
        for (alias, label) in ALIASES {
            assert!(keypad::find(label).is_some(), "{} -> {}", alias, label);
        }
    }
}
