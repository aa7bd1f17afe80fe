//! CLI tool for gridsheet - replays a JSON command script and outputs a JSON snapshot
//!
//! Usage:
//!   gridsheet_cli <script.json>              # Output JSON to stdout
//!   gridsheet_cli <script.json> -o out.json  # Output JSON to file
//!
//! Set `RUST_LOG=gridsheet=debug` to watch the sheet work.

#![allow(clippy::exit)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridsheet::cell_ref::{cell_name, parse_cell_ref};
use gridsheet::{
    BorderMask, CellPos, Justification, Modifiers, Result, Rgba, SelectionMode, Sheet,
    SheetConfig, SheetError, SheetRange, SheetState,
};

/// A replay script: sheet dimensions plus the commands to run against it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Script {
    #[serde(default = "default_rows")]
    rows: usize,
    #[serde(default = "default_columns")]
    columns: usize,
    title: Option<String>,
    #[serde(default)]
    config: SheetConfig,
    /// Widget size in pixels, titles included
    viewport: Option<(i32, i32)>,
    #[serde(default)]
    commands: Vec<Command>,
}

fn default_rows() -> usize {
    100
}

fn default_columns() -> usize {
    26
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Command {
    SetText { cell: String, text: String },
    Clear { range: Option<String> },
    Delete { range: Option<String> },
    InsertRows { at: i32, count: usize },
    InsertColumns { at: i32, count: usize },
    DeleteRows { at: i32, count: usize },
    DeleteColumns { at: i32, count: usize },
    RowHeight { row: i32, height: i32 },
    ColumnWidth { col: i32, width: i32 },
    HideRow { row: i32 },
    HideColumn { col: i32 },
    Click { cell: String },
    SelectRow { row: i32 },
    SelectColumn { col: i32 },
    SelectRange { range: String },
    SelectAll,
    Unselect,
    Extend { cell: String },
    Cursor { rows: i32, cols: i32, #[serde(default)] extend: bool },
    Type { text: String },
    Press { x: i32, y: i32, #[serde(default)] shift: bool },
    Motion { x: i32, y: i32 },
    Release { x: i32, y: i32 },
    Tick,
    ScrollTo { x: i32, y: i32 },
    Background { range: Option<String>, color: String },
    Foreground { range: Option<String>, color: String },
    Justify { range: Option<String>, justification: Justification },
    Border { range: Option<String>, #[serde(default = "default_border_width")] width: u32 },
    Editable { range: Option<String>, editable: bool },
    Lock { locked: bool },
    Mode { mode: SelectionMode },
    Clip { range: String },
    Unclip,
}

fn default_border_width() -> u32 {
    1
}

/// State printed once the script has run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    title: Option<String>,
    rows: i32,
    columns: i32,
    allocated_rows: i32,
    allocated_columns: i32,
    state: SheetState,
    range: String,
    active_cell: String,
    visible_range: String,
    clip: Option<String>,
    grid_color: Rgba,
    cells: Vec<CellSnapshot>,
}

#[derive(Debug, Serialize)]
struct CellSnapshot {
    cell: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<Rgba>,
}

fn cell(sheet: &Sheet, literal: &str) -> Result<CellPos> {
    let pos = parse_cell_ref(literal).ok_or_else(|| SheetError::CellRef(literal.to_string()))?;
    if pos.row > sheet.max_row() || pos.col > sheet.max_col() {
        return Err(SheetError::Script(format!(
            "{literal} lies outside the {}x{} sheet",
            sheet.rows_count(),
            sheet.columns_count()
        )));
    }
    Ok(pos)
}

fn range(literal: Option<&str>) -> Result<Option<SheetRange>> {
    literal.map(str::parse).transpose()
}

fn run_command(sheet: &mut Sheet, command: &Command) -> Result<bool> {
    let done = match command {
        Command::SetText { cell: at, text } => {
            let pos = cell(sheet, at)?;
            sheet.set_cell_text(pos.row, pos.col, text)?
        }
        Command::Clear { range: r } => sheet.range_clear(range(r.as_deref())?.as_ref()) > 0,
        Command::Delete { range: r } => sheet.range_delete(range(r.as_deref())?.as_ref()) > 0,
        Command::InsertRows { at, count } => sheet.insert_rows(*at, *count)?,
        Command::InsertColumns { at, count } => sheet.insert_columns(*at, *count)?,
        Command::DeleteRows { at, count } => sheet.delete_rows(*at, *count),
        Command::DeleteColumns { at, count } => sheet.delete_columns(*at, *count),
        Command::RowHeight { row, height } => sheet.set_row_height(*row, *height),
        Command::ColumnWidth { col, width } => sheet.set_column_width(*col, *width),
        Command::HideRow { row } => {
            sheet.set_row_visible(*row, false);
            true
        }
        Command::HideColumn { col } => {
            sheet.set_column_visible(*col, false);
            true
        }
        Command::Click { cell: at } => {
            let pos = cell(sheet, at)?;
            sheet.click_cell(pos.row, pos.col)
        }
        Command::SelectRow { row } => sheet.select_row(*row),
        Command::SelectColumn { col } => sheet.select_column(*col),
        Command::SelectRange { range: r } => sheet.select_range(&r.parse()?),
        Command::SelectAll => sheet.select_all(),
        Command::Unselect => {
            sheet.unselect_range();
            true
        }
        Command::Extend { cell: at } => {
            let pos = cell(sheet, at)?;
            sheet.extend_selection(pos.row, pos.col)
        }
        Command::Cursor { rows, cols, extend } => sheet.move_cursor(*rows, *cols, *extend),
        Command::Type { text } => {
            sheet.set_entry_text(text);
            sheet.is_editing()
        }
        Command::Press { x, y, shift } => {
            let modifiers = if *shift {
                Modifiers::SHIFT
            } else {
                Modifiers::empty()
            };
            sheet.button_press(*x, *y, modifiers)
        }
        Command::Motion { x, y } => sheet.motion(*x, *y),
        Command::Release { x, y } => sheet.button_release(*x, *y),
        Command::Tick => sheet.autoscroll_tick(),
        Command::ScrollTo { x, y } => sheet.scroll_to(*x, *y),
        Command::Background { range: r, color } => {
            let color: Rgba = color.parse()?;
            sheet.range_set_background(range(r.as_deref())?.as_ref(), color)? > 0
        }
        Command::Foreground { range: r, color } => {
            let color: Rgba = color.parse()?;
            sheet.range_set_foreground(range(r.as_deref())?.as_ref(), color)? > 0
        }
        Command::Justify {
            range: r,
            justification,
        } => sheet.range_set_justification(range(r.as_deref())?.as_ref(), *justification)? > 0,
        Command::Border { range: r, width } => {
            sheet.range_set_border(range(r.as_deref())?.as_ref(), BorderMask::ALL, *width)? > 0
        }
        Command::Editable { range: r, editable } => {
            sheet.range_set_editable(range(r.as_deref())?.as_ref(), *editable)? > 0
        }
        Command::Lock { locked } => {
            sheet.set_locked(*locked);
            true
        }
        Command::Mode { mode } => {
            sheet.set_selection_mode(*mode);
            true
        }
        Command::Clip { range: r } => {
            sheet.clip_range(&r.parse()?);
            sheet.in_clip()
        }
        Command::Unclip => {
            sheet.unclip_range();
            true
        }
    };
    Ok(done)
}

fn snapshot(sheet: &Sheet) -> Snapshot {
    let mut cells: Vec<CellSnapshot> = sheet
        .grid()
        .iter_cells()
        .filter(|c| !c.is_empty())
        .map(|c| CellSnapshot {
            cell: cell_name(CellPos::new(c.row, c.col)),
            text: c.text().to_string(),
            background: c.attributes.as_ref().map(|a| a.background),
        })
        .collect();
    cells.sort_by(|a, b| a.cell.cmp(&b.cell));
    Snapshot {
        title: sheet.title().map(str::to_string),
        rows: sheet.rows_count(),
        columns: sheet.columns_count(),
        allocated_rows: sheet.max_alloc_row() + 1,
        allocated_columns: sheet.max_alloc_col() + 1,
        state: sheet.state(),
        range: sheet.range().to_string(),
        active_cell: cell_name(sheet.active_cell()),
        visible_range: sheet.visible_range().to_string(),
        clip: sheet.in_clip().then(|| sheet.clipped_range().to_string()),
        grid_color: sheet.grid_color(),
        cells,
    }
}

fn run(input_path: &str) -> Result<String> {
    let json = fs::read_to_string(input_path)?;
    let script: Script = serde_json::from_str(&json)?;
    let mut sheet = Sheet::with_config(
        script.rows,
        script.columns,
        script.title.as_deref(),
        script.config,
    )?;
    if let Some((width, height)) = script.viewport {
        sheet.set_viewport_size(width, height);
    }
    for (i, command) in script.commands.iter().enumerate() {
        let done = run_command(&mut sheet, command)?;
        info!(step = i, ?command, done, "replayed");
    }
    Ok(serde_json::to_string_pretty(&snapshot(&sheet))?)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: gridsheet_cli <script.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    let json = match run(input_path) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error replaying {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            if let Err(e) = writeln!(io::stdout(), "{json}") {
                eprintln!("Error writing output: {}", e);
                std::process::exit(1);
            }
        }
    }
}
