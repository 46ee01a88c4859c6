// File: src/export.rs
// Purpose: CSV export of graduate records

use serde::Serialize;

use crate::database::Egresado;

pub const CSV_FILE_NAME: &str = "egresados.csv";

/// Column order of the export; field names become the header row
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    matricula: &'a str,
    nombre_completo: &'a str,
    carrera: &'a str,
    generacion: &'a str,
    estatus: &'a str,
    domicilio: &'a str,
    genero: &'a str,
    telefono: &'a str,
    email: &'a str,
}

impl<'a> From<&'a Egresado> for CsvRow<'a> {
    fn from(e: &'a Egresado) -> Self {
        Self {
            matricula: &e.matricula,
            nombre_completo: &e.nombre_completo,
            carrera: &e.carrera,
            generacion: &e.generacion,
            estatus: &e.estatus,
            domicilio: e.domicilio.as_deref().unwrap_or(""),
            genero: e.genero.as_deref().unwrap_or(""),
            telefono: e.telefono.as_deref().unwrap_or(""),
            email: e.email.as_deref().unwrap_or(""),
        }
    }
}

/// Write records as CSV with a header row
pub fn write_csv<W: std::io::Write>(records: &[Egresado], writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);

    if records.is_empty() {
        // serialize only emits the header alongside the first row
        out.write_record([
            "matricula",
            "nombre_completo",
            "carrera",
            "generacion",
            "estatus",
            "domicilio",
            "genero",
            "telefono",
            "email",
        ])?;
    }

    for record in records {
        out.serialize(CsvRow::from(record))?;
    }

    out.flush()?;
    Ok(())
}

pub fn to_csv_bytes(records: &[Egresado]) -> Result<Vec<u8>, csv::Error> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(buffer)
}
