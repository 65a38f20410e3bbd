use crate::domain::listing::is_truthy_number;
use crate::domain::metrics::LoanEstimate;
use crate::domain::NormalizedListing;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

const HEADERS: [&str; 10] = [
    "Id",
    "Localisation",
    "Pièces",
    "Surface (m²)",
    "Prix",
    "Prix/m²",
    "Type",
    "Lien",
    "Mensualité",
    "Différence (loyer - mensualité)",
];

/// One exported line: the listing plus its loan comparison.
pub struct ExportRow {
    pub listing: NormalizedListing,
    pub loan: Option<LoanEstimate>,
}

pub fn export_listings_xlsx(rows: &[ExportRow]) -> ResultResp {
    let buffer = build_listings_workbook(rows)?;
    xlsx_response(buffer, "annonces.xlsx")
}

/// One row per filtered listing. Missing numbers are left blank rather
/// than written as zero.
pub fn build_listings_workbook(rows: &[ExportRow]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Annonces")
        .map_err(|e| ServerError::XlsxError(format!("Failed to name sheet: {e}")))?;

    let bold = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{header}': {e}"))
            })?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let listing = &row.listing;

        write_text(worksheet, r, 0, &listing.id)?;
        write_text(worksheet, r, 1, &listing.location)?;
        write_text(worksheet, r, 2, &listing.rooms_label)?;
        write_amount(worksheet, r, 3, listing.surface_m2)?;
        write_amount(worksheet, r, 4, listing.price)?;
        if let Some(ppa) = listing.price_per_area() {
            write_amount(worksheet, r, 5, ppa)?;
        }
        write_text(worksheet, r, 6, &listing.kind)?;
        if let Some(url) = &listing.url {
            write_text(worksheet, r, 7, url)?;
        }
        if let Some(loan) = &row.loan {
            write_amount(worksheet, r, 8, loan.monthly_payment)?;
            if let Some(difference) = loan.rent_difference {
                write_signed(worksheet, r, 9, difference)?;
            }
        }
    }

    worksheet.autofit();

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

fn write_text(ws: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<(), ServerError> {
    ws.write_string(row, col, value)
        .map_err(|e| ServerError::XlsxError(format!("Failed to write cell ({row}, {col}): {e}")))?;
    Ok(())
}

fn write_amount(ws: &mut Worksheet, row: u32, col: u16, value: f64) -> Result<(), ServerError> {
    if !is_truthy_number(value) {
        return Ok(());
    }
    ws.write_number(row, col, value)
        .map_err(|e| ServerError::XlsxError(format!("Failed to write cell ({row}, {col}): {e}")))?;
    Ok(())
}

fn write_signed(ws: &mut Worksheet, row: u32, col: u16, value: f64) -> Result<(), ServerError> {
    ws.write_number(row, col, value)
        .map_err(|e| ServerError::XlsxError(format!("Failed to write cell ({row}, {col}): {e}")))?;
    Ok(())
}
