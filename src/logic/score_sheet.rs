//! Score sheet: the round history as CSV.

use crate::models::Session;
use std::io::Write;

/// Write `Hand,<names...>`, one row per round, then a `Total` row.
pub fn write_score_sheet<W: Write>(session: &Session, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    let players = session.players();

    let mut header = vec!["Hand".to_string()];
    header.extend(players.iter().map(|p| p.name.clone()));
    wtr.write_record(&header)?;

    for round in &session.rounds {
        let mut row = vec![round.round_number.to_string()];
        row.extend(players.iter().map(|p| round.score(p.id).to_string()));
        wtr.write_record(&row)?;
    }

    let mut totals = vec!["Total".to_string()];
    totals.extend(players.iter().map(|p| session.total(p.id).to_string()));
    wtr.write_record(&totals)?;

    wtr.flush()?;
    Ok(())
}

/// Score sheet as a String.
pub fn score_sheet_csv(session: &Session) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_score_sheet(session, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
