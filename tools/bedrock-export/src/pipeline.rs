//! Normalize -> map -> document
//!
//! The entry points the shell (and any other caller) uses. Nothing here touches
//! the filesystem; the caller supplies a validated `Geometry` and receives the
//! document tree.

use rig_common::Geometry;
use serde_json::Value;

use crate::bedrock::{map_geometry, BedrockGeometry};
use crate::options::ExportOptions;

/// Apply the normalization switches from `options`
///
/// Order: scale, then normal generation, then UV flip.
pub fn prepare(geometry: &Geometry, options: &ExportOptions) -> Geometry {
    let mut prepared = if options.scale != 1.0 {
        geometry.scaled(options.scale)
    } else {
        geometry.clone()
    };

    if options.generate_normals {
        prepared = prepared.with_generated_normals();
    }
    if options.flip_uvs {
        prepared = prepared.with_flipped_uvs();
    }

    prepared
}

/// Normalize `geometry` and map it to the Bedrock model
pub fn export(geometry: &Geometry, options: &ExportOptions) -> BedrockGeometry {
    let prepared = prepare(geometry, options);
    let mut bedrock = map_geometry(&prepared, options.description_for(&prepared));
    bedrock.format_version = options.format_version.clone();

    tracing::debug!(
        "Exported '{}': {} meshes, {} vertices, {} bones",
        bedrock.description.identifier,
        prepared.meshes().len(),
        prepared.vertex_count(),
        bedrock.bones.len()
    );

    bedrock
}

/// Normalize, map, and build the document tree
pub fn export_document(geometry: &Geometry, options: &ExportOptions) -> Value {
    export(geometry, options).to_document()
}
