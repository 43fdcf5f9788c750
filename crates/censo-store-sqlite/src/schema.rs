//! SQL schema for the census SQLite store.
//!
//! Executed on every connection startup; idempotent thanks to
//! `IF NOT EXISTS` on the table and indexes. The update trigger is dropped
//! and recreated so repeated runs converge on the same definition.

/// Full schema DDL for the `censo_municipal` table.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS censo_municipal (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    email               TEXT NOT NULL UNIQUE,
    apellido_nombre     TEXT NOT NULL,
    tipo_documento      TEXT NOT NULL,
    cuil                TEXT NOT NULL,
    fecha_nacimiento    TEXT,            -- ISO 8601 calendar date
    edad                INTEGER,
    sexo                TEXT,
    estado_civil        TEXT,
    telefono            TEXT,
    domicilio_real      TEXT,
    barrio              TEXT,
    traslado            TEXT,
    condicion_vivienda  TEXT,
    beneficiarios       TEXT,
    domicilio_laboral   TEXT,
    modalidad           TEXT,
    interno             TEXT,
    legajo              TEXT,
    cupo_ley            TEXT,
    adscripto           TEXT,
    lugar_adscripcion   TEXT,
    secretaria          TEXT,
    subsecretaria       TEXT,
    direccion_general   TEXT,
    nivel_jerarquico    TEXT,
    direccion           TEXT,
    departamento        TEXT,
    division            TEXT,
    profesional_adjunto TEXT,
    otro_cargo          TEXT,
    fecha_registro      TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    fecha_actualizacion TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_censo_email          ON censo_municipal(email);
CREATE INDEX IF NOT EXISTS idx_censo_cuil           ON censo_municipal(cuil);
CREATE INDEX IF NOT EXISTS idx_censo_fecha_registro ON censo_municipal(fecha_registro);
CREATE INDEX IF NOT EXISTS idx_censo_secretaria     ON censo_municipal(secretaria);
CREATE INDEX IF NOT EXISTS idx_censo_modalidad      ON censo_municipal(modalidad);

-- Refreshes fecha_actualizacion on any row mutation, regardless of what the
-- UPDATE statement itself set the column to.
DROP TRIGGER IF EXISTS trg_censo_fecha_actualizacion;
CREATE TRIGGER trg_censo_fecha_actualizacion
AFTER UPDATE ON censo_municipal
FOR EACH ROW
BEGIN
    UPDATE censo_municipal
    SET fecha_actualizacion = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE id = NEW.id;
END;

PRAGMA user_version = 1;
";
