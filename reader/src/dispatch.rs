//! Format identification and the top-level read entry point.

use layout::{FieldValue, Generation, ProjectField};
use store::CompObj;
use tracing::{debug, info};

use crate::container::{Container, COMPOBJ_STREAM};
use crate::error::{ReadError, ReadResult};
use crate::hydrator::{hydrator_for, FormatHydrator};
use crate::options::ReadOptions;
use crate::pipeline::Hydration;
use crate::report::ReadReport;
use crate::sink::EntitySink;

/// Application name of the oldest generation, which no pipeline reads.
const UNSUPPORTED_APPLICATION: &str = "Microsoft Project 4.0";

/// What the identity stream says about a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    pub application_name: String,
    pub format: String,
    pub application_id: Option<String>,
    pub generation: Generation,
}

/// Reads the identity stream and picks the generation.
///
/// # Errors
///
/// `MissingStream` without an identity stream, `Store` if it does not
/// parse, `UnsupportedFormat` for any tag no pipeline handles.
pub fn identify<C: Container + ?Sized>(container: &C) -> ReadResult<FileIdentity> {
    let data = container
        .open_stream(&[COMPOBJ_STREAM])?
        .ok_or_else(|| ReadError::MissingStream {
            path: COMPOBJ_STREAM.escape_debug().to_string(),
        })?;
    let CompObj {
        application_name,
        format,
        application_id,
    } = CompObj::decode(&data).map_err(|e| ReadError::store("CompObj", e))?;

    let generation = if application_name == UNSUPPORTED_APPLICATION {
        None
    } else {
        Generation::from_format(&format)
    };
    let Some(generation) = generation else {
        return Err(ReadError::UnsupportedFormat {
            application: application_name,
            format,
        });
    };
    debug!(%format, %generation, "file identified");
    Ok(FileIdentity {
        application_name,
        format,
        application_id,
        generation,
    })
}

/// Reads a whole project file into `sink`.
///
/// Identification failures are fatal. Past that, lenient options let a
/// stage whose streams fail to decode be reported and skipped.
///
/// # Errors
///
/// Any error from [`identify`], a missing required stream, and in strict
/// mode the first stream that fails to decode.
pub fn read_project<C: Container, S: EntitySink>(
    container: &C,
    sink: &mut S,
    options: &ReadOptions,
) -> ReadResult<ReadReport> {
    let identity = identify(container)?;
    read_with(hydrator_for(identity.generation), identity, container, sink, options)
}

/// Reads a file whose identity is already known with a given hydrator.
///
/// # Errors
///
/// As [`read_project`], minus identification.
pub fn read_with<C: Container, S: EntitySink>(
    hydrator: &dyn FormatHydrator,
    identity: FileIdentity,
    container: &C,
    sink: &mut S,
    options: &ReadOptions,
) -> ReadResult<ReadReport> {
    sink.set_project_field(
        ProjectField::ApplicationName,
        FieldValue::Text(identity.application_name.clone()),
    );
    sink.set_project_field(
        ProjectField::FileFormat,
        FieldValue::Text(identity.format.clone()),
    );
    let report = ReadReport::new(
        hydrator.generation(),
        identity.application_name,
        identity.format,
    );
    let report = Hydration::new(hydrator, container, sink, options, report).run()?;
    info!(
        generation = %report.generation,
        stages = report.stages.len(),
        warnings = report.warnings.len(),
        "project read"
    );
    Ok(report)
}
