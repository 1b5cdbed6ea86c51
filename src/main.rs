use clap::builder::PossibleValuesParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command as Cli};
use color_eyre::Result;
use maze_robot::environment::Environment;
use maze_robot::game::{render_path, Command, Game, Mode};
use maze_robot::maze::environment::MazeEnvironment;
use maze_robot::maze::{path_cost, Maze};
use maze_robot::solver::PathFindingManager;
use maze_robot::state::{Direction, Move};
use nanorand::WyRand;
use std::fs::File;
use std::io::{self, stdin, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use termion::cursor::HideCursor;
use termion::event::Key;
use termion::input::TermRead;
use termion::raw::IntoRawMode;
use termion::screen::IntoAlternateScreen;
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const ALGORITHMS: [&str; 4] = [
    "Breadth-First Search",
    "Depth-First Search",
    "A* Search",
    "Greedy Best-First Search",
];

fn game_loop(mut game: Game) -> Result<()> {
    let stdin = stdin();
    let mut stdout = {
        let stdout = stdout().into_alternate_screen()?.into_raw_mode()?;
        HideCursor::from(stdout)
    };

    game.draw(&mut stdout)?;

    for key in stdin.keys() {
        let key = key?;
        let command = match (key, game.mode()) {
            (Key::Up, Mode::Playable) => Command::Movement(Move::step(Direction::Up)),
            (Key::Down, Mode::Playable) => Command::Movement(Move::step(Direction::Down)),
            (Key::Left, Mode::Playable) => Command::Movement(Move::step(Direction::Left)),
            (Key::Right, Mode::Playable) => Command::Movement(Move::step(Direction::Right)),

            (Key::Char('w'), Mode::Playable) => Command::Movement(Move::jump(Direction::Up)),
            (Key::Char('s'), Mode::Playable) => Command::Movement(Move::jump(Direction::Down)),
            (Key::Char('a'), Mode::Playable) => Command::Movement(Move::jump(Direction::Left)),
            (Key::Char('d'), Mode::Playable) => Command::Movement(Move::jump(Direction::Right)),

            (Key::Char('f'), Mode::Playable) => Command::FindPath,
            (Key::Char('f'), Mode::Walkthrough) => Command::ToggleMode,
            (Key::Char('\t'), Mode::Playable | Mode::Walkthrough) => Command::NextAlgorithm,

            (Key::Char('z'), Mode::Walkthrough) => Command::PrevWalkthroughStep,
            (Key::Char('x'), Mode::Walkthrough) => Command::NextWalkthroughStep,

            (Key::Char('r'), _) => Command::Restart,

            (Key::Esc | Key::Ctrl('c'), _) => Command::Exit,

            _ => continue,
        };

        if command == Command::Exit {
            break;
        }

        if game.handle(command)? {
            game.draw(&mut stdout)?;
        }
    }

    Ok(())
}

/// runs one search from the entrance and prints the result
fn solve_and_print(env: &MazeEnvironment, manager: &PathFindingManager<MazeEnvironment>) -> Result<()> {
    let path = manager.solve(env, &env.initial_state())?;
    let algorithm = manager.current_algorithm_name().unwrap_or("none");

    if path.is_empty() {
        println!("{}", env.maze());
        println!("{algorithm}: path not found");
        return Ok(());
    }

    println!("{}", render_path(env, &path));
    let states = path.iter().map(ToString::to_string).collect::<Vec<_>>();
    println!("{}", states.join(" -> "));
    println!(
        "{algorithm}: {} steps, cost {}",
        path.len() - 1,
        path_cost(&path)
    );

    Ok(())
}

fn dimension_in_range(dimension: &str) -> Result<usize, String> {
    let dimension = dimension
        .parse()
        .map_err(|_| format!("`{dimension}` is not a valid number"))?;

    let acceptable = 5..=60;
    acceptable
        .contains(&dimension)
        .then_some(dimension)
        .ok_or_else(|| format!("{dimension} is out of range. acceptable range: {acceptable:?}"))
}

fn init_logging<W>(writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("maze_robot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn cli() -> Cli {
    Cli::new("Maze Robot")
        .arg(
            Arg::new("width")
                .short('w')
                .long("width")
                .help("Number of columns in the maze, walls included")
                .default_value("20")
                .value_parser(dimension_in_range),
        )
        .arg(
            Arg::new("height")
                .short('H')
                .long("height")
                .help("Number of rows in the maze, walls included")
                .default_value("15")
                .value_parser(dimension_in_range),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for the maze generator, for a reproducible maze")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("algorithm")
                .short('a')
                .long("algorithm")
                .help("Path finding algorithm to start with")
                .default_value(ALGORITHMS[0])
                .value_parser(PossibleValuesParser::new(ALGORITHMS)),
        )
        .arg(
            Arg::new("solve")
                .long("solve")
                .help("Print the maze and a path to the target, then exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Where to write logs while playing (discarded otherwise)")
                .value_parser(value_parser!(PathBuf)),
        )
}

fn build_maze(arg_matches: &ArgMatches) -> Result<Maze> {
    let [width, height] =
        ["width", "height"].map(|arg| arg_matches.get_one(arg).copied().expect("default value"));

    match arg_matches.get_one::<u64>("seed") {
        Some(&seed) => Maze::generate(width, height, &mut WyRand::new_seed(seed)),
        None => Maze::new_randomized(width, height),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let arg_matches = cli().get_matches();
    let headless = arg_matches.get_flag("solve");

    if headless {
        init_logging(io::stderr);
    } else if let Some(path) = arg_matches.get_one::<PathBuf>("log-file") {
        init_logging(Mutex::new(File::create(path)?));
    } else {
        init_logging(io::sink);
    }

    let maze = build_maze(&arg_matches)?;
    info!(width = maze.width(), height = maze.height(), "maze ready");
    let env = MazeEnvironment::new(maze);

    let mut manager = PathFindingManager::new();
    if let Some(algorithm) = arg_matches.get_one::<String>("algorithm") {
        manager.set_algorithm(algorithm);
    }

    if headless {
        solve_and_print(&env, &manager)
    } else {
        game_loop(Game::new(env, manager))
    }
}
