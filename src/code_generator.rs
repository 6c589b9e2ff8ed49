use log::debug;
use multimap::MultiMap;
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, OneofDescriptorProto,
};

use crate::fields::{field_generator, FieldGenerator};
use crate::ident::{to_camel, to_pascal};
use crate::message_map::MessageMap;
use crate::printer::Printer;
use crate::{Config, Module};

pub fn module(file: &FileDescriptorProto) -> Module {
    file.package()
        .split('.')
        .filter(|s| !s.is_empty())
        .map(to_pascal)
        .collect()
}

pub struct CodeGenerator<'a> {
    config: &'a Config,
    messages: &'a MessageMap,
    printer: Printer<'a>,
}

impl<'a> CodeGenerator<'a> {
    pub fn generate(
        config: &Config,
        messages: &MessageMap,
        file: FileDescriptorProto,
        buf: &mut String,
    ) {
        debug!("file: {:?}, package: {:?}", file.name(), file.package());

        if buf.is_empty() {
            let namespace = module(&file).join(".");
            buf.push_str("namespace ");
            buf.push_str(if namespace.is_empty() {
                "global"
            } else {
                namespace.as_str()
            });
            buf.push_str("\n\nopen Google.Protobuf\n\n");
        }

        let mut code_gen = CodeGenerator {
            config,
            messages,
            printer: Printer::new(buf),
        };

        for message in file.message_type {
            code_gen.append_message(message);
        }
    }

    fn append_message(&mut self, message: DescriptorProto) {
        debug!("  message: {:?}", message.name());

        assert!(
            message.nested_type.is_empty() && message.enum_type.is_empty(),
            "message {} has nested types, which are not supported",
            message.name(),
        );

        let message_name = to_pascal(message.name());
        let message_vars = [("message_name", message_name.as_str())];

        if message.field.is_empty() {
            self.printer
                .print(&message_vars, "[<Sealed>]\ntype $message_name$() =\n");
            self.printer.indent();
            self.printer.print(&[], "class end\n");
            self.printer.outdent();
            self.printer.print(&[], "\n");
            return;
        }

        let generators: Vec<FieldGenerator> = message
            .field
            .iter()
            .map(|field| field_generator(field, &message, self.messages, self.config))
            .collect();

        // Group oneof members by group index. proto3 synthetic oneofs own no
        // members here and are dropped below.
        let oneof_fields: MultiMap<i32, &FieldDescriptorProto> = message
            .field
            .iter()
            .filter(|field| field.oneof_index.is_some() && !field.proto3_optional())
            .map(|field| (field.oneof_index.unwrap(), field))
            .collect();

        let oneofs: Vec<(i32, &OneofDescriptorProto)> = message
            .oneof_decl
            .iter()
            .enumerate()
            .map(|(idx, oneof)| (idx as i32, oneof))
            .filter(|(idx, _)| oneof_fields.contains_key(idx))
            .collect();

        // F# types do not nest, so each group's discriminant enum precedes
        // the message type.
        for (idx, oneof) in &oneofs {
            self.append_oneof_case_enum(oneof, oneof_fields.get_vec(idx).unwrap());
        }

        let oneof_names: Vec<(String, String)> = oneofs
            .iter()
            .map(|(_, oneof)| (to_camel(oneof.name()), to_pascal(oneof.name())))
            .collect();

        self.printer
            .print(&message_vars, "[<Sealed>]\ntype $message_name$ =\n");
        self.printer.indent();

        for generator in generators.iter().filter(|g| !g.is_oneof_member()) {
            generator.append_val_declaration(&mut self.printer);
        }
        for (oneof_name, oneof_property_name) in &oneof_names {
            self.printer.print(
                &[
                    ("oneof_name", oneof_name.as_str()),
                    ("oneof_property_name", oneof_property_name.as_str()),
                ],
                concat!(
                    "val mutable private $oneof_name$_ : obj\n",
                    "val mutable private $oneof_name$Case_ : $oneof_property_name$OneofCase\n",
                ),
            );
        }

        self.printer.print(&[], "new() =\n");
        self.printer.indent();
        self.printer.print(&[], "{\n");
        self.printer.indent();
        for generator in generators.iter().filter(|g| !g.is_oneof_member()) {
            generator.append_constructor_value(&mut self.printer);
        }
        for (oneof_name, oneof_property_name) in &oneof_names {
            self.printer.print(
                &[
                    ("oneof_name", oneof_name.as_str()),
                    ("oneof_property_name", oneof_property_name.as_str()),
                ],
                concat!(
                    "$oneof_name$_ = null\n",
                    "$oneof_name$Case_ = $oneof_property_name$OneofCase.None\n",
                ),
            );
        }
        self.printer.outdent();
        self.printer.print(&[], "}\n");
        self.printer.outdent();

        for generator in &generators {
            generator.append_members(&mut self.printer);
        }
        for (oneof_name, oneof_property_name) in &oneof_names {
            self.printer.print(
                &[
                    ("oneof_name", oneof_name.as_str()),
                    ("oneof_property_name", oneof_property_name.as_str()),
                    ("access_level", self.config.access_level()),
                ],
                "member $access_level$ this.$oneof_property_name$Case = this.$oneof_name$Case_\n",
            );
        }

        self.printer
            .print(&message_vars, "member this.MergeFrom(other: $message_name$) =\n");
        self.printer.indent();
        for generator in &generators {
            generator.append_merging_code(&mut self.printer);
        }
        self.printer.outdent();

        self.printer
            .print(&[], "member this.MergeFrom(input: CodedInputStream) =\n");
        self.printer.indent();
        self.printer
            .print(&[], "let mutable tag = input.ReadTag()\nwhile tag <> 0u do\n");
        self.printer.indent();
        self.printer.print(&[], "match tag with\n");
        for generator in &generators {
            self.printer
                .print(&[("tag", generator.tag())], "| $tag$u ->\n");
            self.printer.indent();
            generator.append_parsing_code(&mut self.printer);
            self.printer.outdent();
        }
        self.printer
            .print(&[], "| _ -> input.SkipLastField()\ntag <- input.ReadTag()\n");
        self.printer.outdent();
        self.printer.outdent();

        self.printer
            .print(&[], "member this.WriteTo(output: CodedOutputStream) =\n");
        self.printer.indent();
        for generator in &generators {
            generator.append_serialization_code(&mut self.printer);
        }
        self.printer.outdent();

        self.printer.print(&[], "member this.CalculateSize() =\n");
        self.printer.indent();
        self.printer.print(&[], "let mutable size = 0\n");
        for generator in &generators {
            generator.append_serialized_size_code(&mut self.printer);
        }
        self.printer.print(&[], "size\n");
        self.printer.outdent();

        self.printer.print(&[], "override this.GetHashCode() =\n");
        self.printer.indent();
        self.printer.print(&[], "let mutable hash = 1\n");
        for generator in &generators {
            generator.append_hash_code(&mut self.printer);
        }
        self.printer.print(&[], "hash\n");
        self.printer.outdent();

        self.printer
            .print(&message_vars, "member this.Equals(other: $message_name$) =\n");
        self.printer.indent();
        self.printer.print(
            &[],
            concat!(
                "if System.Object.ReferenceEquals(other, null) then false\n",
                "elif System.Object.ReferenceEquals(other, this) then true\n",
            ),
        );
        for generator in &generators {
            generator.append_equals_code(&mut self.printer);
        }
        self.printer.print(&[], "else true\n");
        self.printer.outdent();

        // Wrapper fields contribute nothing to the text format.
        self.printer.print(&[], "override this.ToString() =\n");
        self.printer.indent();
        self.printer
            .print(&[], "let builder = System.Text.StringBuilder()\n");
        for generator in &generators {
            generator.append_to_string(&mut self.printer);
        }
        self.printer.print(&[], "builder.ToString()\n");
        self.printer.outdent();

        self.printer
            .print(&message_vars, "private new(other: $message_name$) =\n");
        self.printer.indent();
        self.printer.print(&[], "{\n");
        self.printer.indent();
        for generator in generators.iter().filter(|g| !g.is_oneof_member()) {
            generator.append_cloning_code(&mut self.printer);
        }
        for (oneof_name, _) in &oneof_names {
            self.printer.print(
                &[("oneof_name", oneof_name.as_str())],
                concat!(
                    "$oneof_name$_ = other.$oneof_name$_\n",
                    "$oneof_name$Case_ = other.$oneof_name$Case_\n",
                ),
            );
        }
        self.printer.outdent();
        self.printer.print(&[], "}\n");
        self.printer.outdent();
        self.printer.print(
            &message_vars,
            "member this.Clone() : $message_name$ = new $message_name$(this)\n",
        );

        self.printer.outdent();
        self.printer.print(&[], "\n");
    }

    fn append_oneof_case_enum(
        &mut self,
        oneof: &OneofDescriptorProto,
        members: &[&FieldDescriptorProto],
    ) {
        debug!("  oneof: {:?}", oneof.name());

        let oneof_property_name = to_pascal(oneof.name());
        self.printer.print(
            &[("oneof_property_name", oneof_property_name.as_str())],
            "type $oneof_property_name$OneofCase =\n",
        );
        self.printer.indent();
        self.printer.print(&[], "| None = 0\n");
        for member in members {
            let property_name = to_pascal(member.name());
            let number = member.number().to_string();
            self.printer.print(
                &[
                    ("property_name", property_name.as_str()),
                    ("number", number.as_str()),
                ],
                "| $property_name$ = $number$\n",
            );
        }
        self.printer.outdent();
        self.printer.print(&[], "\n");
    }
}
