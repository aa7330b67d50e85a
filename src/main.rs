// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::fs::{self, OpenOptions};
use std::io::{self, Result, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use typewiz::questions::{Question, question_order};
use typewiz::save_data::{PlayerData, data_dir};
use typewiz::session::{SegmentState, TypingSession};
use typewiz::stats::{HistorySummary, TypingStats};
use typewiz::{DEFAULT_MAX_VARIANTS, Transliterator, VariantTable};

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

const LOG_FILE: &str = "typewiz.log";

// --------------------------------------------------
// コマンドライン
// --------------------------------------------------

#[derive(Parser)]
#[command(name = "typewiz", version, about = "TYPE WiZ. ひらがなタイピング練習")]
struct Cli {
    /// 変換表を上書きする JSON ファイル（{"か": ["ka", "ca"]} の形式）
    #[arg(long, global = true)]
    table: Option<PathBuf>,

    /// 展開する綴りの上限。`variants` と `check` は文全体を展開するので、
    /// 候補が2つある単位が17個以上ある長い文では上げる必要がある
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_VARIANTS)]
    max_variants: usize,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// タイピング練習を始める（既定）
    Play {
        /// お題をランダムな順番で出す
        #[arg(long)]
        shuffle: bool,
    },
    /// 表示用のローマ字に変換する
    Convert {
        text: String,
        #[arg(long)]
        json: bool,
    },
    /// 打ち方の候補を全て表示する
    Variants {
        text: String,
        #[arg(long)]
        json: bool,
    },
    /// 入力途中のローマ字を検証する
    Check {
        target: String,
        typed: String,
        #[arg(long)]
        json: bool,
    },
    /// 入力単位に区切る
    Group {
        text: String,
        #[arg(long)]
        json: bool,
    },
    /// 変換表を表示する
    Table {
        #[arg(long)]
        json: bool,
    },
    /// 過去の記録を表示する
    History {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&data_dir());

    if let Some(path) = &cli.table {
        VariantTable::install(load_table(path)?).map_err(io::Error::other)?;
        info!(path = %path.display(), "custom variant table installed");
    }
    let engine = Transliterator::global().with_max_variants(cli.max_variants);

    match cli.command.unwrap_or(Command::Play { shuffle: false }) {
        Command::Play { shuffle } => play(engine, shuffle),
        Command::Convert { text, json } => {
            let result = engine.convert(&text);
            if json {
                return print_json(&result);
            }
            println!("{}", result.romaji);
            Ok(())
        }
        Command::Variants { text, json } => {
            let result = engine.expand_variants(&text);
            if json {
                return print_json(&result);
            }
            match result.error {
                Some(error) => {
                    eprintln!("{} {error}", style("error:").red().bold());
                    eprintln!("{}", style("hint: raise --max-variants for long text").dim());
                }
                None => {
                    for variant in &result.variants {
                        println!("{variant}");
                    }
                    println!("{}", style(format!("({} patterns)", result.variants.len())).dim());
                }
            }
            Ok(())
        }
        Command::Check { target, typed, json } => {
            let multi = engine.validate_multi(&target, &typed);
            let single = engine.validate_single(&target, &typed);
            if json {
                return print_json(&serde_json::json!({ "multi": multi, "single": single }));
            }
            if multi.is_valid {
                let next: String = multi.expected_next_chars.iter().collect();
                println!("{} {}", style("OK").green().bold(), multi.matching_variants.join(" "));
                if !next.is_empty() {
                    println!("{} {next}", style("next:").dim());
                }
            } else {
                println!("{} {}", style("NG").red().bold(), multi.error.unwrap_or_default());
            }
            match single.error {
                Some(error) => println!("{} {error}", style("canonical:").dim()),
                None => println!("{} ok", style("canonical:").dim()),
            }
            Ok(())
        }
        Command::Group { text, json } => {
            let units = engine.group(&text);
            if json {
                return print_json(&units);
            }
            for unit in units {
                println!("{:>3}  {}  {:?}", unit.source_index, unit.text, unit.kind);
            }
            Ok(())
        }
        Command::Table { json } => {
            let table = engine.variant_table();
            if json {
                return print_json(&table);
            }
            for (unit, patterns) in table {
                println!("{unit}\t{}", patterns.join(" "));
            }
            Ok(())
        }
        Command::History { json } => show_history(json),
    }
}

/// ログはデータ保存用ディレクトリのファイルに書く（画面は TUI が使う）
fn init_tracing(dir: &Path) {
    if fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(dir.join(LOG_FILE)) else {
        return;
    };
    let filter = EnvFilter::try_from_env("TYPEWIZ_LOG")
        .unwrap_or_else(|_| EnvFilter::new("typewiz=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn load_table(path: &Path) -> Result<VariantTable> {
    let json = fs::read_to_string(path)?;
    VariantTable::from_json(&json).map_err(io::Error::other)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn show_history(json: bool) -> Result<()> {
    let player_data = PlayerData::load();
    let summary = HistorySummary::from_records(&player_data.history);
    if json {
        return print_json(&serde_json::json!({
            "summary": summary,
            "player": player_data,
        }));
    }

    println!(
        "{}  Lv.{}  ({} / {} XP)",
        style("TYPE WiZ").magenta().bold(),
        player_data.level,
        player_data.current_xp,
        player_data.required_xp_for_next_level()
    );
    println!(
        "sessions: {}  avg WPM: {:.0}  avg accuracy: {:.0}%  best WPM: {:.0}",
        summary.total_sessions, summary.average_wpm, summary.average_accuracy, summary.best_wpm
    );
    for record in player_data.history.iter().rev().take(10) {
        println!(
            "{}  {:<12} WPM {:>5.1}  {:>5.1}%  miss {:>2}  {:.2}s",
            style(record.timestamp.format("%m/%d %H:%M")).dim(),
            record.question_japanese,
            record.wpm,
            record.accuracy,
            record.misses,
            record.duration_sec
        );
    }
    Ok(())
}

// --------------------------------------------------
// データ構造
// --------------------------------------------------

/// アプリ全体の状態を管理する
struct AppState {
    engine: Transliterator<'static>,
    questions: Vec<Question>,      // 出題順のお題
    current_question_index: usize, // 今何問目か

    /// 現在のお題の入力状態
    session: TypingSession,

    /// 直前のお題の成績
    last_stats: Option<TypingStats>,
    /// 直前にレベルが上がったか
    last_leveled_up: bool,

    /// プレイヤーデータ
    player_data: PlayerData,
}

impl AppState {
    /// AppState の初期化
    fn new(engine: Transliterator<'static>, shuffle: bool) -> Self {
        let questions = question_order(shuffle, &mut rand::rng());
        let session = TypingSession::with_engine(questions[0].hiragana, &engine);
        Self {
            engine,
            questions,
            current_question_index: 0,
            session,
            last_stats: None,
            last_leveled_up: false,
            player_data: PlayerData::load(), // 起動時にロード
        }
    }

    fn current_question(&self) -> &Question {
        &self.questions[self.current_question_index]
    }

    /// 次のお題に進む
    fn next_question(&mut self) {
        // リザルトを計算して保存
        let stats = self.session.stats();
        let question = *self.current_question();
        self.last_leveled_up = self.player_data.record(&question, &stats);
        self.last_stats = Some(stats);
        if let Err(e) = self.player_data.save() {
            warn!("failed to save player data: {e}");
        }

        // 次のお題へ
        self.current_question_index = (self.current_question_index + 1) % self.questions.len();
        self.session =
            TypingSession::with_engine(self.current_question().hiragana, &self.engine);
    }
}

// --------------------------------------------------
// TUIセットアップと実行ループ
// --------------------------------------------------

fn play(engine: Transliterator<'static>, shuffle: bool) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, engine, shuffle);
    restore_terminal()?;
    result
}

fn setup_terminal() -> Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?; // 代替スクリーンを使用
    stdout().execute(Hide)?; // カーソルを非表示
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn restore_terminal() -> Result<()> {
    stdout().execute(Show)?; // カーソルを再表示
    stdout().execute(LeaveAlternateScreen)?; // 代替スクリーンを終了
    disable_raw_mode()?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<impl Backend>,
    engine: Transliterator<'static>,
    shuffle: bool,
) -> Result<()> {
    let mut app_state = AppState::new(engine, shuffle);

    loop {
        terminal.draw(|f| ui(f, &app_state))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => break,
                        KeyCode::Tab => app_state.session.reset(), // やり直し
                        KeyCode::Backspace => app_state.session.backspace(),
                        KeyCode::Char(c) => {
                            app_state.session.input(c);
                            // 完了したら自動で次へ
                            if app_state.session.is_finished() {
                                app_state.next_question();
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    Ok(())
}

// --------------------------------------------------
// UI描画
// --------------------------------------------------

fn ui(f: &mut Frame, app_state: &AppState) {
    let size = f.area();
    // 枠線を描画
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Type Wiz !")
        .title_bottom(" Esc: quit  Tab: retry ");
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] ステータスバー (Lv, XP)
            Constraint::Length(2), // [1] リザルト (2行)
            Constraint::Length(1), // [2] 日本語
            Constraint::Length(1), // [3] 空白
            Constraint::Length(1), // [4] ひらがな
            Constraint::Min(1),    // [5] タイピングエリア
        ])
        .split(inner_area);

    // 0. ステータスバー (レベルとXPゲージ)
    let pd = &app_state.player_data;
    let req_xp = pd.required_xp_for_next_level();
    let ratio = if req_xp > 0 {
        (pd.current_xp as f64 / req_xp as f64).min(1.0)
    } else {
        0.0
    };

    let label = format!("Lv.{} ({} / {})", pd.level, pd.current_xp, req_xp);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::NONE))
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black))
        .ratio(ratio)
        .label(label);
    f.render_widget(gauge, chunks[0]);

    // 1. リザルト表示
    let (speed_text, score_text) = match app_state.last_stats {
        Some(s) => (
            format!("CPS: {:.2} / WPM: {:.0} / Time: {:.2}s", s.cps, s.wpm, s.duration_sec),
            format!(
                "Score: {:.0} / Acc: {:.1}% / Miss: {}{}",
                s.score,
                s.accuracy,
                s.misses,
                if app_state.last_leveled_up { " / LEVEL UP!" } else { "" }
            ),
        ),
        None => (String::new(), String::new()),
    };

    let result_paragraph = Paragraph::new(vec![
        Line::from(speed_text).style(Style::default().fg(Color::Yellow)),
        Line::from(score_text).style(Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(result_paragraph, chunks[1]);

    // 2. 日本語（漢字混じり）表示
    let question = app_state.current_question();
    f.render_widget(
        Paragraph::new(question.japanese)
            .style(Style::default().fg(Color::White).bold())
            .centered(),
        chunks[2],
    );

    // 3. ひらがな表示
    f.render_widget(
        Paragraph::new(question.hiragana)
            .style(Style::default().fg(Color::Gray))
            .centered(),
        chunks[4],
    );

    // 4. ローマ字タイピングエリア表示
    let mut spans = Vec::new();
    for view in app_state.session.views() {
        match view.state {
            // 完了済み (緑)
            SegmentState::Done => {
                spans.push(Span::styled(view.typed, Style::default().fg(Color::Green)));
            }
            // 入力中
            SegmentState::Current => {
                if !view.typed.is_empty() {
                    spans.push(Span::styled(view.typed, Style::default().fg(Color::Green)));
                }

                let mut remaining = view.remaining.chars();
                if let Some(next) = remaining.next() {
                    // カーソル (白または赤)
                    let cursor_style = if app_state.session.is_error() {
                        Style::default().fg(Color::White).bg(Color::Red)
                    } else {
                        Style::default().fg(Color::Black).bg(Color::White)
                    };
                    spans.push(Span::styled(next.to_string(), cursor_style));

                    // カーソル以降の残り (灰色)
                    let rest = remaining.as_str();
                    if !rest.is_empty() {
                        spans.push(Span::styled(rest, Style::default().fg(Color::Gray)));
                    }
                }
            }
            // まだ手をつけていない (灰色)
            SegmentState::Pending => {
                spans.push(Span::styled(view.remaining, Style::default().fg(Color::DarkGray)));
            }
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)).centered(), chunks[5]);
}
