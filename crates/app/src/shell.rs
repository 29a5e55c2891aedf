//! Line-oriented front end: reads commands from stdin, prints snapshots.

use std::error::Error;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin};
use tracing::debug;

use brain_core::Clock;
use brain_core::model::{BestScores, GameKind, GameSettings, Language, Phase};
use services::{
    DriverError, Feedback, Navigator, RoundView, Screen, SessionDriver, SessionSnapshot,
    new_session,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    /// One JSON snapshot per line.
    Json,
}

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R = Stdin> {
    settings: GameSettings,
    seed: Option<u64>,
    output: Output,
    navigator: Navigator,
    best: BestScores,
    input: Lines<BufReader<R>>,
}

impl Shell<Stdin> {
    pub fn new(settings: GameSettings, seed: Option<u64>, output: Output) -> Self {
        Self::with_input(tokio::io::stdin(), settings, seed, output)
    }
}

impl<R: AsyncRead + Unpin> Shell<R> {
    fn with_input(input: R, settings: GameSettings, seed: Option<u64>, output: Output) -> Self {
        Self {
            settings,
            seed,
            output,
            navigator: Navigator::new(),
            best: BestScores::new(),
            input: BufReader::new(input).lines(),
        }
    }

    pub async fn run(
        &mut self,
        language: Option<Language>,
        game: Option<GameKind>,
    ) -> Result<(), Box<dyn Error>> {
        if language.is_some() || game.is_some() {
            self.navigator
                .select_language(language.unwrap_or_default())?;
        }
        if let Some(kind) = game {
            self.navigator.open_challenge(kind)?;
        }

        loop {
            let flow = match self.navigator.screen() {
                Screen::LanguageSelect => self.language_screen().await?,
                Screen::Dashboard => self.dashboard().await?,
                Screen::Challenge(kind) => self.play(kind).await?,
            };
            if let Flow::Quit = flow {
                return Ok(());
            }
        }
    }

    async fn read_line(&mut self) -> Result<Option<String>, Box<dyn Error>> {
        let line = self.input.next_line().await?;
        Ok(line.map(|line| line.trim().to_string()))
    }

    async fn language_screen(&mut self) -> Result<Flow, Box<dyn Error>> {
        println!("Choose a language:");
        for (i, language) in Language::ALL.iter().enumerate() {
            println!(
                "  {:>2}. {} {} ({})",
                i + 1,
                language.flag(),
                language.name(),
                language.native_name()
            );
        }

        let Some(line) = self.read_line().await? else {
            return Ok(Flow::Quit);
        };
        if line == "q" {
            return Ok(Flow::Quit);
        }
        match pick(&line, &Language::ALL).or_else(|| line.parse().ok()) {
            Some(language) => {
                self.navigator.select_language(language)?;
            }
            None => println!("unknown language: {line}"),
        }
        Ok(Flow::Continue)
    }

    async fn dashboard(&mut self) -> Result<Flow, Box<dyn Error>> {
        println!();
        println!("Challenges [{}]:", self.navigator.language());
        for (i, info) in self.navigator.catalog().iter().enumerate() {
            let best = self
                .best
                .get(info.kind)
                .map(|score| format!("  best {score}"))
                .unwrap_or_default();
            println!(
                "  {}. {} {} - {}{best}",
                i + 1,
                info.icon,
                info.name,
                info.description
            );
        }
        println!("Pick a number, 'l' to change language, 'q' to quit.");

        let Some(line) = self.read_line().await? else {
            return Ok(Flow::Quit);
        };
        match line.as_str() {
            "q" => return Ok(Flow::Quit),
            "l" => {
                self.navigator.change_language()?;
            }
            _ => match pick(&line, &GameKind::ALL).or_else(|| line.parse().ok()) {
                Some(kind) => {
                    self.navigator.open_challenge(kind)?;
                }
                None => println!("unknown challenge: {line}"),
            },
        }
        Ok(Flow::Continue)
    }

    async fn play(&mut self, kind: GameKind) -> Result<Flow, Box<dyn Error>> {
        let session = new_session(kind, &self.settings, Clock::system(), self.seed);
        let driver = SessionDriver::spawn(session, std::mem::take(&mut self.best));
        println!();
        println!("{}  (numbers to answer, 'r' restart, 'b' back, 'q' quit)", kind.info().name);

        let flow = self.drive(&driver).await;
        // The records come back even when the game loop failed.
        self.best = driver.shutdown().await?;
        let flow = flow?;
        debug!(%kind, "left challenge");
        if let Flow::Continue = flow {
            self.navigator.back_to_dashboard()?;
        }
        Ok(flow)
    }

    async fn drive(&mut self, driver: &SessionDriver) -> Result<Flow, Box<dyn Error>> {
        let mut updates = driver.subscribe();
        driver.start().await?;

        let mut last_shown = None;
        let flow = loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break Flow::Continue;
                    }
                    let snapshot = updates.borrow_and_update().clone();
                    self.show(&snapshot, &mut last_shown)?;
                }
                line = self.input.next_line() => {
                    let Some(line) = line? else {
                        break Flow::Quit;
                    };
                    match line.trim() {
                        "q" => break Flow::Quit,
                        "b" => break Flow::Continue,
                        "r" => {
                            last_shown = None;
                            driver.start().await?;
                        }
                        raw => {
                            let input = if raw.is_empty() { None } else { raw.parse().ok() };
                            if input.is_none() && !raw.is_empty() {
                                println!("enter a number");
                                continue;
                            }
                            match driver.submit(input).await {
                                Ok(_) => {}
                                Err(DriverError::Input(err)) => println!("ignored: {err}"),
                                Err(err) => return Err(err.into()),
                            }
                        }
                    }
                }
            }
        };
        Ok(flow)
    }

    fn show(
        &self,
        snapshot: &SessionSnapshot,
        last_shown: &mut Option<String>,
    ) -> Result<(), Box<dyn Error>> {
        let text = render(snapshot);
        if last_shown.as_deref() == Some(text.as_str()) {
            return Ok(());
        }
        match self.output {
            Output::Text => println!("{text}"),
            Output::Json => println!("{}", serde_json::to_string(snapshot)?),
        }
        *last_shown = Some(text);
        Ok(())
    }
}

/// 1-based menu choice.
fn pick<T: Copy>(line: &str, items: &[T]) -> Option<T> {
    let index: usize = line.parse().ok()?;
    items.get(index.checked_sub(1)?).copied()
}

/// Text view of a snapshot. Stopwatch ticks are left out so a running
/// stopwatch does not reprint the board.
fn render(snapshot: &SessionSnapshot) -> String {
    let mut lines = Vec::new();

    match &snapshot.round {
        RoundView::Empty => {}
        RoundView::Grid { tiles, next } => {
            let width = grid_width(tiles.len());
            for row in tiles.chunks(width) {
                let cells: Vec<String> = row
                    .iter()
                    .map(|tile| {
                        if tile < next {
                            " ·".to_string()
                        } else {
                            format!("{tile:>2}")
                        }
                    })
                    .collect();
                lines.push(cells.join(" "));
            }
            if snapshot.phase.is_live() {
                lines.push(format!("next: {next}"));
            }
        }
        RoundView::Problem {
            lhs,
            operation,
            rhs,
        } => {
            let remaining = snapshot.remaining.unwrap_or_default();
            lines.push(format!(
                "[{remaining:>2}s] score {}   {lhs} {} {rhs} = ?",
                snapshot.score,
                operation.symbol()
            ));
        }
        RoundView::Sequence {
            length,
            highlighted,
            entered,
        } => {
            let line = match (snapshot.phase, highlighted) {
                (Phase::Revealing, Some(lit)) => {
                    format!("level {}  digit {}/{length}: [{}]", snapshot.level, lit.index + 1, lit.digit)
                }
                (Phase::Revealing, None) => format!("level {}  ...", snapshot.level),
                _ => {
                    let mut slots: Vec<String> = entered.iter().map(u8::to_string).collect();
                    slots.resize(*length, "_".to_string());
                    format!("level {}  {}", snapshot.level, slots.join(" "))
                }
            };
            lines.push(line);
        }
        RoundView::Pattern { shown, options, .. } => {
            let shown: Vec<String> = shown.iter().map(i64::to_string).collect();
            let options: Vec<String> = options.iter().map(i64::to_string).collect();
            lines.push(format!(
                "score {}  {}, ?    options: {}",
                snapshot.score,
                shown.join(", "),
                options.join(" | ")
            ));
        }
    }

    match snapshot.feedback {
        Some(Feedback::Correct) => lines.push("correct".into()),
        Some(Feedback::Wrong) => lines.push("wrong, try again".into()),
        Some(Feedback::RoundComplete) => lines.push("round complete".into()),
        Some(Feedback::Finished {
            outcome,
            score,
            new_record,
        }) => {
            let record = if new_record { "  new record!" } else { "" };
            lines.push(format!("game over ({outcome:?}): {score}{record}"));
            if let Some(best) = snapshot.best {
                lines.push(format!("best: {best}   'r' to play again, 'b' to go back"));
            }
        }
        None => {}
    }

    lines.join("\n")
}

fn grid_width(tiles: usize) -> usize {
    let mut width = 1;
    while width * width < tiles {
        width += 1;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use brain_core::model::{GameOutcome, GameResult, Score};
    use brain_core::time::fixed_now;
    use tokio::io::ReadBuf;

    #[test]
    fn menu_choice_is_one_based() {
        assert_eq!(pick("1", &GameKind::ALL), Some(GameKind::NumberTap));
        assert_eq!(pick("4", &GameKind::ALL), Some(GameKind::PatternMatch));
        assert_eq!(pick("0", &GameKind::ALL), None);
        assert_eq!(pick("5", &GameKind::ALL), None);
        assert_eq!(pick("math", &GameKind::ALL), None);
    }

    #[test]
    fn grid_is_square() {
        assert_eq!(grid_width(25), 5);
        assert_eq!(grid_width(26), 6);
        assert_eq!(grid_width(4), 2);
    }

    struct ClosedInput;

    impl AsyncRead for ClosedInput {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed")))
        }
    }

    fn shell_with_record<R: AsyncRead + Unpin>(input: R) -> Shell<R> {
        let mut shell = Shell::with_input(input, GameSettings::default(), Some(1), Output::Json);
        shell.best.record(&GameResult {
            game: GameKind::PatternMatch,
            outcome: GameOutcome::Lost,
            score: Score::Points(30),
            finished_at: fixed_now(),
        });
        shell.navigator.select_language(Language::En).unwrap();
        shell.navigator.open_challenge(GameKind::PatternMatch).unwrap();
        shell
    }

    #[tokio::test]
    async fn records_survive_a_failed_game_loop() {
        let mut shell = shell_with_record(ClosedInput);
        assert!(shell.play(GameKind::PatternMatch).await.is_err());
        assert_eq!(shell.best.get(GameKind::PatternMatch), Some(Score::Points(30)));
    }

    #[tokio::test]
    async fn leaving_a_challenge_returns_records_and_screen() {
        let mut shell = shell_with_record(&b"b\n"[..]);
        let flow = shell.play(GameKind::PatternMatch).await.unwrap();
        assert!(matches!(flow, Flow::Continue));
        assert_eq!(shell.navigator.screen(), Screen::Dashboard);
        assert_eq!(shell.best.get(GameKind::PatternMatch), Some(Score::Points(30)));
    }

    #[test]
    fn stopwatch_ticks_do_not_change_the_render() {
        let session = new_session(
            GameKind::NumberTap,
            &GameSettings::default(),
            Clock::system(),
            Some(3),
        );
        let mut snapshot = session.snapshot();
        let before = render(&snapshot);
        snapshot.elapsed_ticks += 10;
        snapshot.revision += 1;
        assert_eq!(render(&snapshot), before);
    }
}
