//! Field-level code generation for wrapper-typed fields.
//!
//! Wrapper messages (`google.protobuf.Int32Value` and friends) represent an
//! optional scalar whose presence is distinct from the scalar's own default.
//! The generated F# stores the value in a nullable slot and moves it across
//! the wire through a shared `FieldCodec`, which encodes the wrapper as a
//! length-delimited embedded message holding one optional scalar field.

use log::debug;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto, OneofDescriptorProto};

use crate::ident::{to_camel, to_pascal};
use crate::message_map::MessageMap;
use crate::printer::Printer;
use crate::Config;

/// Returns `true` if `type_name` references one of the well-known wrapper
/// message types.
pub fn is_wrapper_type(type_name: &str) -> bool {
    matches!(
        type_name,
        ".google.protobuf.BoolValue"
            | ".google.protobuf.BytesValue"
            | ".google.protobuf.DoubleValue"
            | ".google.protobuf.FloatValue"
            | ".google.protobuf.Int32Value"
            | ".google.protobuf.Int64Value"
            | ".google.protobuf.StringValue"
            | ".google.protobuf.UInt32Value"
            | ".google.protobuf.UInt64Value"
    )
}

/// The field-kind generators this backend supports. Each variant carries a
/// context computed once at construction; the emission operations only read
/// that context, so a given generator produces the same fragment no matter
/// how often or in which order the driver invokes it.
pub enum FieldGenerator {
    Wrapper(WrapperField),
    WrapperOneof(WrapperOneofField),
}

/// Builds the generator for `field`, which must be a singular wrapper-typed
/// field of `message`. Anything else is a schema violation: this backend
/// generates the wrapper field family only.
pub fn field_generator(
    field: &FieldDescriptorProto,
    message: &DescriptorProto,
    messages: &MessageMap,
    config: &Config,
) -> FieldGenerator {
    assert!(
        field.label() != Label::Repeated,
        "field {}.{} is repeated; only singular wrapper fields are supported",
        message.name(),
        field.name(),
    );
    assert!(
        field.r#type() == Type::Message && is_wrapper_type(field.type_name()),
        "field {}.{} has type {:?}; only wrapper-typed fields are supported",
        message.name(),
        field.name(),
        field.type_name(),
    );

    match field.oneof_index {
        // proto3 optional fields sit in a synthetic oneof; they generate as
        // plain wrapper fields.
        Some(idx) if !field.proto3_optional() => {
            let oneof = &message.oneof_decl[idx as usize];
            FieldGenerator::WrapperOneof(WrapperOneofField::new(
                field, message, oneof, messages, config,
            ))
        }
        _ => FieldGenerator::Wrapper(WrapperField::new(field, message, messages, config)),
    }
}

impl FieldGenerator {
    fn base(&self) -> &WrapperField {
        match self {
            FieldGenerator::Wrapper(field) => field,
            FieldGenerator::WrapperOneof(field) => &field.base,
        }
    }

    /// The field's wire tag as a decimal string, for the parse dispatch.
    pub fn tag(&self) -> &str {
        &self.base().tag
    }

    pub fn is_oneof_member(&self) -> bool {
        matches!(self, FieldGenerator::WrapperOneof(_))
    }

    pub fn append_val_declaration(&self, printer: &mut Printer<'_>) {
        self.base().append_val_declaration(printer);
    }

    pub fn append_constructor_value(&self, printer: &mut Printer<'_>) {
        self.base().append_constructor_value(printer);
    }

    pub fn append_members(&self, printer: &mut Printer<'_>) {
        match self {
            FieldGenerator::Wrapper(field) => field.append_members(printer),
            FieldGenerator::WrapperOneof(field) => field.append_members(printer),
        }
    }

    pub fn append_merging_code(&self, printer: &mut Printer<'_>) {
        self.base().append_merging_code(printer);
    }

    pub fn append_parsing_code(&self, printer: &mut Printer<'_>) {
        match self {
            FieldGenerator::Wrapper(field) => field.append_parsing_code(printer),
            FieldGenerator::WrapperOneof(field) => field.append_parsing_code(printer),
        }
    }

    pub fn append_serialization_code(&self, printer: &mut Printer<'_>) {
        match self {
            FieldGenerator::Wrapper(field) => field.append_serialization_code(printer),
            FieldGenerator::WrapperOneof(field) => field.append_serialization_code(printer),
        }
    }

    pub fn append_serialized_size_code(&self, printer: &mut Printer<'_>) {
        match self {
            FieldGenerator::Wrapper(field) => field.append_serialized_size_code(printer),
            FieldGenerator::WrapperOneof(field) => field.append_serialized_size_code(printer),
        }
    }

    pub fn append_hash_code(&self, printer: &mut Printer<'_>) {
        self.base().append_hash_code(printer);
    }

    pub fn append_equals_code(&self, printer: &mut Printer<'_>) {
        self.base().append_equals_code(printer);
    }

    pub fn append_cloning_code(&self, printer: &mut Printer<'_>) {
        self.base().append_cloning_code(printer);
    }

    pub fn append_to_string(&self, printer: &mut Printer<'_>) {
        self.base().append_to_string(printer);
    }
}

/// Generates a singular wrapper-typed field: a nullable storage slot, one
/// shared per-message codec, and accessor/merge/parse/write fragments that
/// keep presence distinct from the wrapped type's default.
pub struct WrapperField {
    name: String,
    property_name: String,
    type_name: String,
    nonnullable_type_name: Option<String>,
    is_value_type: bool,
    has_property_check: String,
    has_not_property_check: String,
    full_codec: String,
    default_value: String,
    tag: String,
    access_level: &'static str,
}

impl WrapperField {
    pub fn new(
        field: &FieldDescriptorProto,
        message: &DescriptorProto,
        messages: &MessageMap,
        config: &Config,
    ) -> WrapperField {
        let wrapper = messages.get(field.type_name()).unwrap_or_else(|| {
            panic!(
                "wrapper type {} is not in the request; compile with --include_imports",
                field.type_name(),
            )
        });
        assert_eq!(
            1,
            wrapper.field.len(),
            "wrapper type {} must have exactly one field",
            field.type_name(),
        );

        let wrapped = &wrapper.field[0];
        let wrapped_type = wrapped.r#type();
        let is_value_type = wrapped_type != Type::String && wrapped_type != Type::Bytes;

        let name = to_camel(field.name());
        let property_name = to_pascal(field.name());
        let type_name = fsharp_type(wrapped_type).to_string();

        debug!(
            "    field: {:?}, wrapped type: {}, value type: {}",
            field.name(),
            type_name,
            is_value_type
        );

        WrapperField {
            has_property_check: format!("{}_.HasValue", name),
            has_not_property_check: format!("(not this.{}_.HasValue)", name),
            full_codec: format!("{}._single_{}_codec", to_pascal(message.name()), name),
            nonnullable_type_name: is_value_type.then(|| type_name.clone()),
            default_value: fsharp_default(wrapped_type).to_string(),
            tag: wire_tag(field.number()).to_string(),
            access_level: config.access_level(),
            name,
            property_name,
            type_name,
            is_value_type,
        }
    }

    fn variables(&self) -> Vec<(&str, &str)> {
        let mut vars = vec![
            ("name", self.name.as_str()),
            ("property_name", self.property_name.as_str()),
            ("type_name", self.type_name.as_str()),
            ("has_property_check", self.has_property_check.as_str()),
            ("has_not_property_check", self.has_not_property_check.as_str()),
            ("full_codec", self.full_codec.as_str()),
            ("default_value", self.default_value.as_str()),
            ("tag", self.tag.as_str()),
            ("access_level", self.access_level),
        ];
        if let Some(nonnullable) = &self.nonnullable_type_name {
            vars.push(("nonnullable_type_name", nonnullable.as_str()));
        }
        vars
    }

    pub fn append_val_declaration(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            "val mutable private $name$_ : System.Nullable<$type_name$>\n",
        );
    }

    pub fn append_constructor_value(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            "$name$_ = new System.Nullable<$type_name$>()\n",
        );
    }

    pub fn append_members(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            "static member private _single_$name$_codec = ",
        );
        self.append_codec(printer);
        printer.print(&[], "\n");
        printer.print(
            &self.variables(),
            concat!(
                "member $access_level$ this.$property_name$\n",
                "  with get() = this.$name$_\n",
                "  and set(value: System.Nullable<$type_name$>) =\n",
                "    this.$name$_ <- value\n",
            ),
        );
    }

    // Value-category wrappers marshal through the struct codec, which boxes
    // and unboxes; text and byte wrappers share references through the class
    // codec.
    fn append_codec(&self, printer: &mut Printer<'_>) {
        if self.is_value_type {
            printer.print(
                &self.variables(),
                "FieldCodec.ForStructWrapper<$nonnullable_type_name$>($tag$u)",
            );
        } else {
            printer.print(
                &self.variables(),
                "FieldCodec.ForClassWrapper<$type_name$>($tag$u)",
            );
        }
    }

    // A present default-valued field survives a merge from an instance whose
    // field is absent, while absent-to-present transitions still propagate.
    pub fn append_merging_code(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            concat!(
                "if other.$has_property_check$ then\n",
                "  if $has_not_property_check$ || other.$property_name$.Value <> $default_value$ then\n",
                "    this.$property_name$ <- other.$property_name$\n",
            ),
        );
    }

    pub fn append_parsing_code(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            concat!(
                "let value = $full_codec$.Read(input)\n",
                "if $has_not_property_check$ || (value.HasValue && value.Value <> $default_value$) then\n",
                "  this.$property_name$ <- value\n",
            ),
        );
    }

    // Presence, not value-vs-default, decides what goes on the wire.
    pub fn append_serialization_code(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            concat!(
                "if this.$has_property_check$ then\n",
                "  $full_codec$.WriteTagAndValue(output, this.$property_name$)\n",
            ),
        );
    }

    pub fn append_serialized_size_code(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            concat!(
                "if this.$has_property_check$ then\n",
                "  size <- size + $full_codec$.CalculateSizeWithTag(this.$property_name$)\n",
            ),
        );
    }

    pub fn append_hash_code(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            "if this.$has_property_check$ then hash <- hash ^^^ this.$property_name$.GetHashCode()\n",
        );
    }

    pub fn append_equals_code(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            "else if this.$property_name$ <> other.$property_name$ then false\n",
        );
    }

    pub fn append_cloning_code(&self, printer: &mut Printer<'_>) {
        printer.print(&self.variables(), "$name$_ = other.$name$_\n");
    }

    /// Wrapper fields have no text-format rendering.
    pub fn append_to_string(&self, _printer: &mut Printer<'_>) {}
}

/// Generates a wrapper-typed member of a oneof. Storage moves to the group's
/// shared slot and discriminant, so member declaration, parsing, and
/// serialization are replaced; the remaining operations reuse the base
/// generator, whose presence checks were resolved against the discriminant
/// at construction.
pub struct WrapperOneofField {
    base: WrapperField,
    oneof_name: String,
    oneof_property_name: String,
}

impl WrapperOneofField {
    pub fn new(
        field: &FieldDescriptorProto,
        message: &DescriptorProto,
        oneof: &OneofDescriptorProto,
        messages: &MessageMap,
        config: &Config,
    ) -> WrapperOneofField {
        let mut base = WrapperField::new(field, message, messages, config);

        let oneof_name = to_camel(oneof.name());
        let oneof_property_name = to_pascal(oneof.name());
        base.has_property_check = format!(
            "{}Case_ = {}OneofCase.{}",
            oneof_name, oneof_property_name, base.property_name,
        );
        base.has_not_property_check = format!(
            "(this.{}Case_ <> {}OneofCase.{})",
            oneof_name, oneof_property_name, base.property_name,
        );
        // One codec per field, not per group: several members of the same
        // group may be wrapper-typed.
        base.full_codec = format!("{}._oneof_{}_codec", to_pascal(message.name()), base.name);

        WrapperOneofField {
            base,
            oneof_name,
            oneof_property_name,
        }
    }

    fn variables(&self) -> Vec<(&str, &str)> {
        let mut vars = self.base.variables();
        vars.push(("oneof_name", self.oneof_name.as_str()));
        vars.push(("oneof_property_name", self.oneof_property_name.as_str()));
        vars
    }

    pub fn append_members(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            "static member private _oneof_$name$_codec = ",
        );
        self.base.append_codec(printer);
        printer.print(&[], "\n");
        printer.print(
            &self.variables(),
            concat!(
                "member $access_level$ this.$property_name$\n",
                "  with get() =\n",
                "    if this.$has_property_check$ then this.$oneof_name$_ :?> System.Nullable<$type_name$>\n",
                "    else new System.Nullable<$type_name$>()\n",
                "  and set(value: System.Nullable<$type_name$>) =\n",
                "    this.$oneof_name$_ <- box value\n",
                "    this.$oneof_name$Case_ <- if value.HasValue then $oneof_property_name$OneofCase.$property_name$ else $oneof_property_name$OneofCase.None\n",
            ),
        );
    }

    // The last field written to the wire wins outright; the retention check
    // of the singular case does not apply to oneof members.
    pub fn append_parsing_code(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            "this.$property_name$ <- $full_codec$.Read(input)\n",
        );
    }

    pub fn append_serialization_code(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            concat!(
                "if this.$has_property_check$ then\n",
                "  $full_codec$.WriteTagAndValue(output, this.$oneof_name$_ :?> System.Nullable<$type_name$>)\n",
            ),
        );
    }

    pub fn append_serialized_size_code(&self, printer: &mut Printer<'_>) {
        printer.print(
            &self.variables(),
            concat!(
                "if this.$has_property_check$ then\n",
                "  size <- size + $full_codec$.CalculateSizeWithTag(this.$property_name$)\n",
            ),
        );
    }
}

// Wrapper values are embedded as a length-delimited message.
fn wire_tag(number: i32) -> u32 {
    (number as u32) << 3 | 2
}

fn fsharp_type(ty: Type) -> &'static str {
    match ty {
        Type::Double => "double",
        Type::Float => "float32",
        Type::Int64 | Type::Sint64 | Type::Sfixed64 => "int64",
        Type::Uint64 | Type::Fixed64 => "uint64",
        Type::Int32 | Type::Sint32 | Type::Sfixed32 => "int",
        Type::Uint32 | Type::Fixed32 => "uint32",
        Type::Bool => "bool",
        Type::String => "string",
        Type::Bytes => "ByteString",
        Type::Group | Type::Message | Type::Enum => {
            panic!("wrapped field type {:?} is not a wrapper scalar", ty)
        }
    }
}

fn fsharp_default(ty: Type) -> &'static str {
    match ty {
        Type::Double => "0.0",
        Type::Float => "0.0f",
        Type::Int64 | Type::Sint64 | Type::Sfixed64 => "0L",
        Type::Uint64 | Type::Fixed64 => "0UL",
        Type::Int32 | Type::Sint32 | Type::Sfixed32 => "0",
        Type::Uint32 | Type::Fixed32 => "0u",
        Type::Bool => "false",
        Type::String => "\"\"",
        Type::Bytes => "ByteString.Empty",
        Type::Group | Type::Message | Type::Enum => {
            panic!("wrapped field type {:?} is not a wrapper scalar", ty)
        }
    }
}
