use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use futures_lab::config::LabConfig;
use futures_lab::lab::AdvancedStrategy;
use futures_lab::lab::BasisConvergence;
use futures_lab::lab::BasisRisk;
use futures_lab::lab::FuturesBasics;
use futures_lab::lab::FuturesPricing;
use futures_lab::lab::HedgingBuilder;
use futures_lab::lab::MarginCalls;
use futures_lab::lab::MatchingSystem;
use futures_lab::lab::OptimalHedgeRatio;
use futures_lab::lab::RealWorldCase;
use futures_lab::lab::RollingFutures;
use futures_lab::lab::TradingPnl;
use futures_lab::quant::strategies::RollingHedge;
use futures_lab::quant::HedgeMode;
use futures_lab::quant::PositionSide;
use futures_lab::quiz;
use futures_lab::quiz::Certificate;
use futures_lab::quiz::QuizSubmission;
use futures_lab::report::render_panel;
use futures_lab::traits::PanelExt;
use futures_lab::visualization::numbered_path;
use tracing::info;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Futures trading and hedging lab
#[derive(Parser)]
#[command(name = "futures-lab")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Lab configuration file (TOML)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Log filter used when RUST_LOG is unset
  #[arg(long, global = true, default_value = "info")]
  log_level: String,

  /// Write the lesson charts to this HTML file; further charts get a `-2`, `-3`.. suffix
  #[arg(long, global = true)]
  chart: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
  Long,
  Short,
}

impl From<Side> for PositionSide {
  fn from(side: Side) -> Self {
    match side {
      Side::Long => PositionSide::Long,
      Side::Short => PositionSide::Short,
    }
  }
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
  Optimal,
  Under,
  Over,
  Custom,
}

#[derive(Clone, Copy, ValueEnum)]
enum Case {
  Equity,
  Airline,
  Exporter,
  Producer,
  Calendar,
  Arbitrage,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
  Directional,
  Calendar,
  Cross,
  Rolling,
  Compare,
}

#[derive(Subcommand)]
enum Commands {
  /// Lesson 1: long futures payoff
  Basics {
    #[arg(long, default_value_t = 22_000.0)]
    entry: f64,
  },

  /// Lesson 2: cost-of-carry pricing
  Pricing {
    #[arg(long, default_value_t = 500.0)]
    spot: f64,
    /// Annual rate in percent
    #[arg(long, default_value_t = 8.0)]
    rate: f64,
    /// Years to maturity
    #[arg(long, default_value_t = 0.5)]
    tau: f64,
  },

  /// Lesson 3: mark-to-market and margin calls
  Margin {
    #[arg(long, value_enum, default_value = "long")]
    side: Side,
    #[arg(long, default_value_t = 22_000.0)]
    entry: f64,
    #[arg(long, default_value_t = 5)]
    contracts: u32,
    #[arg(long)]
    initial: Option<f64>,
    #[arg(long)]
    maintenance: Option<f64>,
  },

  /// Lesson 4: long versus short P&L
  Pnl {
    #[arg(long, default_value_t = 22_000.0)]
    entry: f64,
    #[arg(long, default_value_t = 5)]
    contracts: u32,
  },

  /// Lesson 5: hedging strategy builder
  Hedge {
    #[arg(long, default_value_t = 5_000_000.0)]
    portfolio: f64,
    #[arg(long, default_value_t = 1.0)]
    beta: f64,
    #[arg(long, default_value_t = 22_000.0)]
    futures: f64,
    #[arg(long, value_enum, default_value = "optimal")]
    mode: Mode,
    /// Hedge ratio multiplier for `--mode custom`
    #[arg(long)]
    factor: Option<f64>,
  },

  /// Lesson 6: optimal contract count
  Optimal {
    #[arg(long, default_value_t = 5_000_000.0)]
    portfolio: f64,
    #[arg(long, default_value_t = 1.0)]
    beta: f64,
    #[arg(long, default_value_t = 22_000.0)]
    futures: f64,
  },

  /// Lesson 7: basis and convergence
  Basis {
    #[arg(long, default_value_t = 22_000.0)]
    spot: f64,
    #[arg(long, default_value_t = 22_150.0)]
    futures: f64,
    #[arg(long, default_value_t = 30)]
    days: usize,
  },

  /// Lesson 8: hedge effectiveness from correlation
  BasisRisk {
    #[arg(long, default_value_t = 0.8)]
    correlation: f64,
  },

  /// Lesson 9: roll cost
  Roll {
    #[arg(long, default_value_t = 22_000.0)]
    near: f64,
    #[arg(long, default_value_t = 22_150.0)]
    far: f64,
  },

  /// Lesson 10: order matching
  Matching {
    #[arg(long, default_value_t = 60)]
    buys: u32,
    #[arg(long, default_value_t = 50)]
    sells: u32,
    #[arg(long, default_value_t = 22_000.0)]
    price: f64,
  },

  /// Lesson 11: real-world cases
  Case {
    #[arg(value_enum)]
    kind: Case,
  },

  /// Lesson 12: advanced strategies
  Strategy {
    #[arg(value_enum)]
    kind: Strategy,
    /// Fix the rolling hedge noise
    #[arg(long)]
    seed: Option<u64>,
  },

  /// Lesson 13: grade a quiz and issue the certificate
  Quiz {
    /// TOML file with `answers` and a `[student]` table
    #[arg(short, long)]
    answers: PathBuf,
    /// Certificate date (YYYY-MM-DD), today when omitted
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
  },
}

fn init_tracing(log_level: &str) {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();
}

fn hedge_mode(mode: Mode, factor: Option<f64>) -> Result<HedgeMode> {
  Ok(match mode {
    Mode::Optimal => HedgeMode::Optimal,
    Mode::Under => HedgeMode::Under,
    Mode::Over => HedgeMode::Over,
    Mode::Custom => HedgeMode::Custom(factor.context("`--mode custom` needs `--factor`")?),
  })
}

fn panel(command: &Commands, config: &LabConfig) -> Result<Box<dyn PanelExt>> {
  let multiplier = config.contract_multiplier;
  let ladder = &config.price_ladder;
  let panel: Box<dyn PanelExt> = match *command {
    Commands::Basics { entry } => Box::new(FuturesBasics {
      entry,
      half_width: ladder.half_width,
      points: ladder.points,
    }),
    Commands::Pricing { spot, rate, tau } => Box::new(FuturesPricing {
      spot,
      rate: rate / 100.0,
      tau,
    }),
    Commands::Margin {
      side,
      entry,
      contracts,
      initial,
      maintenance,
    } => Box::new(MarginCalls {
      side: side.into(),
      entry,
      contracts,
      multiplier,
      initial_margin: initial.unwrap_or(config.margin.initial),
      maintenance_margin: maintenance.unwrap_or(config.margin.maintenance),
      half_width: ladder.half_width,
      points: ladder.points,
    }),
    Commands::Pnl { entry, contracts } => Box::new(TradingPnl {
      entry,
      contracts,
      multiplier,
      half_width: ladder.half_width,
      points: ladder.points,
    }),
    Commands::Hedge {
      portfolio,
      beta,
      futures,
      mode,
      factor,
    } => Box::new(HedgingBuilder {
      portfolio_value: portfolio,
      beta,
      futures_price: futures,
      multiplier,
      mode: hedge_mode(mode, factor)?,
      low_move: config.hedge_scenario.low,
      high_move: config.hedge_scenario.high,
      points: config.hedge_scenario.points,
    }),
    Commands::Optimal {
      portfolio,
      beta,
      futures,
    } => Box::new(OptimalHedgeRatio {
      portfolio_value: portfolio,
      beta,
      futures_price: futures,
      multiplier,
    }),
    Commands::Basis {
      spot,
      futures,
      days,
    } => Box::new(BasisConvergence {
      spot,
      futures,
      days_to_expiry: days,
      multiplier,
      ..BasisConvergence::default()
    }),
    Commands::BasisRisk { correlation } => Box::new(BasisRisk { correlation }),
    Commands::Roll { near, far } => Box::new(RollingFutures { near, far }),
    Commands::Matching { buys, sells, price } => Box::new(MatchingSystem {
      buy_orders: buys,
      sell_orders: sells,
      price,
    }),
    Commands::Case { kind } => Box::new(match kind {
      Case::Equity => RealWorldCase::EquityPortfolio {
        portfolio_value: 5_000_000.0,
        futures_price: 22_000.0,
        multiplier,
      },
      Case::Airline => RealWorldCase::airline_fuel(),
      Case::Exporter => RealWorldCase::exporter_currency(),
      Case::Producer => RealWorldCase::commodity_producer(),
      Case::Calendar => RealWorldCase::calendar_spread_desk(),
      Case::Arbitrage => RealWorldCase::arbitrage_desk(),
    }),
    Commands::Strategy { kind, seed } => Box::new(match kind {
      Strategy::Directional => AdvancedStrategy::directional(),
      Strategy::Calendar => AdvancedStrategy::calendar_spread(),
      Strategy::Cross => AdvancedStrategy::cross_hedging(),
      Strategy::Rolling => AdvancedStrategy::RollingHedge(RollingHedge::new(1_000_000.0, 6, seed)),
      Strategy::Compare => AdvancedStrategy::strategy_comparison(),
    }),
    Commands::Quiz { .. } => anyhow::bail!("the quiz is not a lesson panel"),
  };
  Ok(panel)
}

fn run_panel(cli: &Cli, config: &LabConfig) -> Result<()> {
  let panel = panel(&cli.command, config)?;
  let output = match panel.render() {
    Ok(output) => output,
    Err(err) => {
      warn!(%err, "lesson inputs rejected");
      return Err(err).with_context(|| format!("rendering `{}`", panel.title()));
    }
  };
  info!(title = %output.title, rows = output.table.len(), "panel rendered");
  println!("{}", render_panel(&output, config.table_decimals));

  if let Some(path) = &cli.chart {
    if output.charts.is_empty() {
      warn!(title = %output.title, "panel has no chart");
    }
    for (index, chart) in output.charts.iter().enumerate() {
      let path = numbered_path(path, index);
      chart
        .write_html(&path)
        .with_context(|| format!("writing chart to {}", path.display()))?;
    }
  }
  Ok(())
}

fn run_quiz(
  config: &LabConfig,
  answers: &Path,
  date: Option<NaiveDate>,
  output_dir: Option<&Path>,
) -> Result<()> {
  let text = std::fs::read_to_string(answers)
    .with_context(|| format!("reading answers from {}", answers.display()))?;
  let submission = QuizSubmission::from_toml_str(&text).context("parsing answers")?;
  let result = quiz::grade(&submission.answers)?;
  println!("Score: {}/{}", result.score, result.total);

  if !submission.student.is_identified() {
    warn!("name and id are required for the workbook and certificate");
    return Ok(());
  }

  let dir = output_dir.unwrap_or(&config.quiz.output_dir);
  std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
  let workbook = quiz::write_workbook(dir, &submission.student, &submission.answers)
    .context("writing workbook")?;
  println!("Workbook: {}", workbook.display());
  if !result.passed(config.quiz.pass_mark) {
    println!("Score below {}, no certificate issued", config.quiz.pass_mark);
    return Ok(());
  }
  let issued_on = date.unwrap_or_else(|| chrono::Local::now().date_naive());
  let certificate = Certificate::issue(
    &config.title,
    &submission.student,
    &result,
    config.quiz.pass_mark,
    issued_on,
    config.quiz.instructor.as_deref(),
  )?;
  let path = certificate.write_html(dir).context("writing certificate")?;
  println!("Certificate: {}", path.display());
  Ok(())
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(&cli.log_level);

  let config = LabConfig::load(cli.config.as_deref()).context("loading configuration")?;

  match &cli.command {
    Commands::Quiz {
      answers,
      date,
      output_dir,
    } => run_quiz(&config, answers, *date, output_dir.as_deref()),
    _ => run_panel(&cli, &config),
  }
}
