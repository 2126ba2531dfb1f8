//! C# source rendering for type skeletons.
//!
//! Produces declaration-only `partial` types: the real implementation is
//! expected to be merged in later, so bodies hold nothing but serialized
//! field declarations and embedded nested types. Field types are printed
//! fully qualified; the skeleton must compile without using directives
//! beyond the engine prelude.

use tracing::debug;

use crate::reflect::{EnumMember, Primitive, TypeDescriptor, TypeRef, TypeRegistry, TypeShape};

use super::SkeletonGenerator;

impl SkeletonGenerator {
    /// Render one root type to source text.
    ///
    /// Also collects every type reference the rendered text depends on
    /// (eligible base, emitted field types, embedded nested types) so the
    /// caller can queue them for dumping.
    pub(super) fn render_source(
        &self,
        registry: &TypeRegistry,
        desc: &TypeDescriptor,
    ) -> (String, Vec<TypeRef>) {
        let mut out = String::from("using UnityEngine;\n\n");
        let mut refs = Vec::new();

        let namespace = desc.name.namespace.as_deref();
        if let Some(ns) = namespace {
            out.push_str(&format!("namespace {ns} {{\n"));
        }
        let indent = usize::from(namespace.is_some());

        match &desc.shape {
            TypeShape::Enum { underlying, members } => {
                render_enum(&mut out, desc, *underlying, members, indent);
            }
            _ => {
                if let Some(base) = &desc.base {
                    if self.base_eligible(base) {
                        refs.push(base.clone());
                    }
                }
                self.render_class(registry, &mut out, &mut refs, desc, indent);
            }
        }

        if namespace.is_some() {
            out.push_str("}\n");
        }
        (out, refs)
    }

    fn render_class(
        &self,
        registry: &TypeRegistry,
        out: &mut String,
        refs: &mut Vec<TypeRef>,
        desc: &TypeDescriptor,
        indent: usize,
    ) {
        if let TypeShape::Enum { underlying, members } = &desc.shape {
            render_enum(out, desc, *underlying, members, indent);
            return;
        }

        let pad = "    ".repeat(indent);
        if desc.serializable_marker {
            out.push_str(&format!("{pad}[System.Serializable]\n"));
        }

        let keyword = match desc.shape {
            TypeShape::Interface => "interface",
            _ => "class",
        };
        let modifier = if desc.is_abstract && keyword == "class" {
            "abstract "
        } else {
            ""
        };
        let mut name = desc.name.name().to_string();
        if !desc.generic_params.is_empty() {
            name = format!("{}<{}>", name, desc.generic_params.join(", "));
        }
        match &desc.base {
            Some(base) => out.push_str(&format!(
                "{pad}public {modifier}partial {keyword} {name} : {} {{\n",
                base.csharp_name()
            )),
            None => {
                out.push_str(&format!("{pad}public {modifier}partial {keyword} {name} {{\n"));
            }
        }

        for field in &desc.fields {
            if !field.serializable {
                continue;
            }
            if !self.field_type_referencable(registry, &field.ty) {
                debug!(owner = %desc.name, field = %field.name, "skip field with unloadable type");
                continue;
            }
            out.push_str(&format!(
                "{pad}    public {} {};\n",
                field.ty.csharp_name(),
                field.name
            ));
            refs.push(field.ty.clone());
        }

        for nested_name in &desc.nested {
            let Some(nested) = registry.get(nested_name) else {
                debug!(ty = %nested_name, "nested type not captured in registry");
                continue;
            };
            if self.should_embed_nested(nested) {
                out.push('\n');
                self.render_class(registry, out, refs, nested, indent + 1);
            } else {
                debug!(ty = %nested.name, "skip nested type");
            }
        }

        out.push_str(&format!("{pad}}}\n"));
    }
}

fn render_enum(
    out: &mut String,
    desc: &TypeDescriptor,
    underlying: Primitive,
    members: &[EnumMember],
    indent: usize,
) {
    let pad = "    ".repeat(indent);
    out.push_str(&format!(
        "{pad}public enum {} : {} {{\n",
        desc.name.name(),
        underlying.full_name()
    ));
    let body: Vec<String> = members
        .iter()
        .map(|m| format!("{pad}    {} = {}", m.name, m.value))
        .collect();
    out.push_str(&body.join(",\n"));
    out.push('\n');
    out.push_str(&format!("{pad}}}\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{FieldDescriptor, QualName};
    use tempfile::TempDir;

    fn game_type(name: &str) -> QualName {
        QualName::new("Game.Core", Some("My.Game"), name)
    }

    fn behaviour_base() -> TypeRef {
        TypeRef::named(QualName::new(
            "UnityEngine.CoreModule",
            Some("UnityEngine"),
            "MonoBehaviour",
        ))
    }

    fn render(registry: &TypeRegistry, desc: &TypeDescriptor) -> (String, Vec<TypeRef>) {
        let tmp = TempDir::new().unwrap();
        SkeletonGenerator::new(tmp.path(), true).render_source(registry, desc)
    }

    #[test]
    fn behaviour_class_with_primitive_fields() {
        let registry = TypeRegistry::new();
        let desc = TypeDescriptor::class(game_type("Mover"))
            .with_base(behaviour_base())
            .with_field(FieldDescriptor::new("count", TypeRef::Primitive(Primitive::Int)))
            .with_field(FieldDescriptor::new("speed", TypeRef::Primitive(Primitive::Float)));

        let (source, refs) = render(&registry, &desc);
        assert_eq!(
            source,
            "using UnityEngine;\n\n\
             namespace My.Game {\n\
             \x20   public partial class Mover : UnityEngine.MonoBehaviour {\n\
             \x20       public System.Int32 count;\n\
             \x20       public System.Single speed;\n\
             \x20   }\n\
             }\n"
        );
        // Engine base is not queued; primitive fields are.
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn root_enum_renders_inside_namespace() {
        let registry = TypeRegistry::new();
        let desc = TypeDescriptor::enumeration(
            game_type("Rank"),
            Primitive::Int,
            vec![EnumMember::new("Novice", 0), EnumMember::new("Expert", 10)],
        );

        let (source, refs) = render(&registry, &desc);
        assert_eq!(
            source,
            "using UnityEngine;\n\n\
             namespace My.Game {\n\
             \x20   public enum Rank : System.Int32 {\n\
             \x20       Novice = 0,\n\
             \x20       Expert = 10\n\
             \x20   }\n\
             }\n"
        );
        assert!(refs.is_empty());
    }

    #[test]
    fn global_namespace_type_is_unwrapped() {
        let registry = TypeRegistry::new();
        let desc =
            TypeDescriptor::class(QualName::new("Game.Core", None, "Loose")).serializable();

        let (source, _) = render(&registry, &desc);
        assert_eq!(
            source,
            "using UnityEngine;\n\n\
             [System.Serializable]\n\
             public partial class Loose {\n\
             }\n"
        );
    }

    #[test]
    fn nested_enum_is_embedded_with_short_name() {
        let mut registry = TypeRegistry::new();
        let outer = game_type("Outer");
        let mode = outer.nested("Mode");
        registry.register(TypeDescriptor::enumeration(
            mode.clone(),
            Primitive::Byte,
            vec![EnumMember::new("Off", 0), EnumMember::new("On", 1)],
        ));
        let desc = TypeDescriptor::class(outer)
            .with_base(behaviour_base())
            .with_field(FieldDescriptor::new("mode", TypeRef::Named(mode.clone())))
            .with_nested(mode);

        let (source, _) = render(&registry, &desc);
        assert_eq!(
            source,
            "using UnityEngine;\n\n\
             namespace My.Game {\n\
             \x20   public partial class Outer : UnityEngine.MonoBehaviour {\n\
             \x20       public My.Game.Outer.Mode mode;\n\
             \n\
             \x20       public enum Mode : System.Byte {\n\
             \x20           Off = 0,\n\
             \x20           On = 1\n\
             \x20       }\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn unloadable_fields_are_dropped() {
        let mut registry = TypeRegistry::new();
        // Plain class without serializable marker: not referencable.
        registry.register(TypeDescriptor::class(game_type("Opaque")));
        let desc = TypeDescriptor::class(game_type("Holder"))
            .with_field(FieldDescriptor::new("opaque", TypeRef::named(game_type("Opaque"))))
            .with_field(
                FieldDescriptor::new("cached", TypeRef::Primitive(Primitive::Int))
                    .non_serializable(),
            )
            .with_field(FieldDescriptor::new(
                "slot",
                TypeRef::GenericParam("T".into()),
            ))
            .with_field(FieldDescriptor::new("kept", TypeRef::Primitive(Primitive::Bool)));

        let (source, refs) = render(&registry, &desc);
        assert_eq!(
            source,
            "using UnityEngine;\n\n\
             namespace My.Game {\n\
             \x20   public partial class Holder {\n\
             \x20       public System.Boolean kept;\n\
             \x20   }\n\
             }\n"
        );
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn whitelisted_engine_values_are_referencable() {
        let registry = TypeRegistry::new();
        let curve = QualName::new(
            "UnityEngine.CoreModule",
            Some("UnityEngine"),
            "AnimationCurve",
        );
        let desc = TypeDescriptor::class(game_type("Tuner"))
            .with_field(FieldDescriptor::new("ramp", TypeRef::Named(curve)))
            .with_field(FieldDescriptor::new(
                "offsets",
                TypeRef::array(TypeRef::named(QualName::new(
                    "UnityEngine.CoreModule",
                    Some("UnityEngine"),
                    "Vector3",
                ))),
            ));

        let (source, _) = render(&registry, &desc);
        assert!(source.contains("public UnityEngine.AnimationCurve ramp;\n"));
        assert!(source.contains("public UnityEngine.Vector3[] offsets;\n"));
    }

    #[test]
    fn generic_definition_and_abstract_interface_shapes() {
        let registry = TypeRegistry::new();
        let pool = TypeDescriptor::class(game_type("Pool"))
            .with_generic_params(&["T"])
            .abstract_type();
        let (source, _) = render(&registry, &pool);
        assert!(source.contains("public abstract partial class Pool<T> {\n"));

        let shim = TypeDescriptor::interface(game_type("Pokeable"));
        let (source, _) = render(&registry, &shim);
        assert!(source.contains("public partial interface Pokeable {\n"));
    }
}
