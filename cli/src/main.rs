use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mozaiku_core::{
    DirImageSource, DropOutcome, GRID_MAX, GRID_MIN, GameSession, GridSize, ImageSource,
    NewGameOutcome, TileSlicer,
};
use mozaiku_image_pipeline::CanvasSlicer;

#[derive(Parser)]
#[command(name = "mozaiku", version, about = "Headless host for the mozaiku puzzle engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice an image into puzzle tiles and write them out as PNG files.
    Slice {
        image: PathBuf,
        #[arg(long, default_value_t = GRID_MIN)]
        grid: u32,
        #[arg(long, default_value = "tiles")]
        out: PathBuf,
    },
    /// Deal a shuffled board and let a bot drag it back to solved.
    Play {
        /// Explicit image; omitted, a random one is picked from --assets.
        image: Option<PathBuf>,
        #[arg(long, default_value = "assets/puzzles")]
        assets: PathBuf,
        #[arg(long, default_value_t = GRID_MIN)]
        grid: u32,
    },
    /// List the images the asset source would offer.
    Images {
        #[arg(long, default_value = "assets/puzzles")]
        assets: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Slice { image, grid, out } => slice(&image, grid, &out),
        Commands::Play {
            image,
            assets,
            grid,
        } => play(image, &assets, grid),
        Commands::Images { assets } => {
            images(&assets);
            Ok(())
        }
    }
}

fn parse_grid(grid: u32) -> Result<GridSize, Box<dyn Error>> {
    GridSize::new(grid)
        .ok_or_else(|| format!("grid must be between {GRID_MIN} and {GRID_MAX}").into())
}

fn slice(image: &PathBuf, grid: u32, out: &PathBuf) -> Result<(), Box<dyn Error>> {
    let grid = parse_grid(grid)?;
    let bytes = fs::read(image)?;
    let tiles = CanvasSlicer::default().slice(&bytes, grid)?;

    fs::create_dir_all(out)?;
    for tile in &tiles {
        let path = out.join(format!("tile_{:02}.png", tile.original_index()));
        fs::write(&path, tile.content())?;
    }
    println!(
        "wrote {} tiles of {}x{} px to {}",
        tiles.len(),
        grid.piece_size(),
        grid.piece_size(),
        out.display()
    );
    Ok(())
}

fn play(image: Option<PathBuf>, assets: &PathBuf, grid: u32) -> Result<(), Box<dyn Error>> {
    let grid = parse_grid(grid)?;
    let slicer = CanvasSlicer::default();
    let mut session = GameSession::new(grid);

    match image {
        Some(path) => session.load_image(&slicer, fs::read(&path)?)?,
        None => {
            let source = DirImageSource::new(assets);
            match session.new_random(&slicer, &source)? {
                NewGameOutcome::Loaded => {}
                NewGameOutcome::Reshuffled => unreachable!("fresh session has no board"),
                NewGameOutcome::NoImages => {
                    return Err(format!("no images in {}", assets.display()).into());
                }
            }
        }
    }

    // A solved deal is a legal shuffle outcome; it is never redealt.
    if session.is_solved() {
        println!("the deal came out already solved in 0 moves");
        return Ok(());
    }

    // Bot: drag the tile belonging in the lowest wrong slot onto that
    // slot. Finishes any deal in at most N^2 - 1 swaps.
    loop {
        let Some(board) = session.board() else {
            break;
        };
        let Some(target) = board
            .tiles()
            .iter()
            .enumerate()
            .find(|(slot, tile)| tile.original_index() != *slot)
            .map(|(slot, _)| slot)
        else {
            break;
        };
        let Some(from) = board
            .tiles()
            .iter()
            .position(|tile| tile.original_index() == target)
        else {
            break;
        };

        let (row, col) = board.grid().row_col(target);
        session.begin_drag(from);
        match session.drop_on(target) {
            DropOutcome::Swapped { move_count } => {
                println!("move {move_count}: slot {from} -> slot {target} (row {row}, col {col})");
            }
            DropOutcome::Solved { move_count } => {
                println!("move {move_count}: slot {from} -> slot {target} (row {row}, col {col})");
                println!("solved in {move_count} moves");
                break;
            }
            DropOutcome::Ignored => break,
        }
    }

    if session.locked() {
        session.begin_drag(0);
        let outcome = session.drop_on(1);
        println!("board is locked; further drops report {outcome:?}");
    }
    Ok(())
}

fn images(assets: &PathBuf) {
    let source = DirImageSource::new(assets);
    let names = source.list();
    if names.is_empty() {
        println!("no candidate images in {}", source.dir().display());
        return;
    }
    for name in names {
        println!("{name}");
    }
}
