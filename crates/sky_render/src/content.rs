//! Dependency discovery for XML content files (pipelines, materials, scene
//! graphs). Only references are extracted; the documents are otherwise opaque.

use roxmltree::Document;

use crate::engine::ResourceKind;

/// A resource referenced from inside another resource's file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub kind: ResourceKind,
    pub name: String,
}

/// Attribute name -> kind of resource it points at.
const REFERENCE_ATTRIBUTES: &[(&str, ResourceKind)] = &[
    ("material", ResourceKind::Material),
    ("link", ResourceKind::Material),
    ("geometry", ResourceKind::Geometry),
    ("sceneGraph", ResourceKind::SceneGraph),
    ("map", ResourceKind::Texture),
];

pub fn is_xml_resource(name: &str) -> bool {
    name.ends_with(".xml")
}

/// Collects every referenced resource in document order, without duplicates.
/// `<Shader source="...">` is a shader reference; other `source` attributes
/// are ignored.
pub fn scan_dependencies(raw: &str) -> Result<Vec<Dependency>, String> {
    let doc = Document::parse(raw).map_err(|error| {
        format!(
            "malformed XML at {}:{}: {error}",
            error.pos().row,
            error.pos().col
        )
    })?;

    let mut deps: Vec<Dependency> = Vec::new();
    let mut push = |kind: ResourceKind, name: &str| {
        let name = name.trim();
        if name.is_empty() || deps.iter().any(|d| d.kind == kind && d.name == name) {
            return;
        }
        deps.push(Dependency {
            kind,
            name: name.to_string(),
        });
    };

    for node in doc.descendants().filter(|n| n.is_element()) {
        for &(attr, kind) in REFERENCE_ATTRIBUTES {
            if let Some(value) = node.attribute(attr) {
                push(kind, value);
            }
        }
        if node.tag_name().name() == "Shader" {
            if let Some(value) = node.attribute("source") {
                push(ResourceKind::Shader, value);
            }
        }
    }

    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_references_become_material_dependencies() {
        let raw = r#"
        <Pipeline>
          <CommandQueue>
            <Stage id="Lighting" link="pipelines/globalSettings.material.xml">
              <DrawQuad material="pipelines/postHDR.material.xml" context="BRIGHTPASS" />
              <DrawQuad material="pipelines/postHDR.material.xml" context="BLUR" />
            </Stage>
          </CommandQueue>
        </Pipeline>
        "#;
        let deps = scan_dependencies(raw).expect("pipeline should parse");
        assert_eq!(
            deps,
            vec![
                Dependency {
                    kind: ResourceKind::Material,
                    name: "pipelines/globalSettings.material.xml".to_string(),
                },
                Dependency {
                    kind: ResourceKind::Material,
                    name: "pipelines/postHDR.material.xml".to_string(),
                },
            ]
        );
    }

    #[test]
    fn scene_and_material_references_are_typed() {
        let raw = r#"
        <Model name="sphere" geometry="models/sphere/sphere.geo">
          <Mesh name="mesh" material="models/sphere/sphere.material.xml" />
        </Model>
        "#;
        let deps = scan_dependencies(raw).expect("scene should parse");
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].kind, ResourceKind::Geometry);
        assert_eq!(deps[1].kind, ResourceKind::Material);

        let raw = r#"
        <Material>
          <Shader source="shaders/model.shader" />
          <Sampler name="albedoMap" map="textures/common/white.tga" />
        </Material>
        "#;
        let deps = scan_dependencies(raw).expect("material should parse");
        assert_eq!(deps[0].kind, ResourceKind::Shader);
        assert_eq!(deps[1].kind, ResourceKind::Texture);
    }

    #[test]
    fn source_outside_shader_element_is_ignored() {
        let raw = r#"<Material><Code source="shaders/utilityLib/fragLighting.glsl" /></Material>"#;
        assert!(scan_dependencies(raw).expect("should parse").is_empty());
    }

    #[test]
    fn malformed_xml_reports_position() {
        let err = scan_dependencies("<Pipeline><Stage></Pipeline>").expect_err("should fail");
        assert!(err.contains("malformed XML at 1:"), "unexpected error: {err}");
    }

    #[test]
    fn xml_suffix_detection() {
        assert!(is_xml_resource("pipelines/hdr.pipeline.xml"));
        assert!(!is_xml_resource("shaders/model.shader"));
    }
}
