use crate::cli::ui;
use crate::config::AppConfig;
use crate::history::HistoryLog;
use crate::store;
use anyhow::Result;
use comfy_table::Cell;

pub fn run(config: &AppConfig) -> Result<()> {
    let blob_store = store::open(config)?;
    let history = HistoryLog::load(blob_store);

    if history.is_empty() {
        println!("No conversion history yet.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Amount"),
        ui::header_cell("From"),
        ui::header_cell("Result"),
        ui::header_cell("To"),
        ui::header_cell("When"),
    ]);

    for record in history.records() {
        table.add_row(vec![
            Cell::new(record.amount),
            Cell::new(&record.from),
            Cell::new(format!("{:.2}", record.result)),
            Cell::new(&record.to),
            Cell::new(record.timestamp.format("%b %d, %Y %H:%M").to_string()),
        ]);
    }

    println!("{table}");
    Ok(())
}
