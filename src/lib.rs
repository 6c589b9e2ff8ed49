//! `fsharp-codegen` generates F# protobuf bindings from compiled `.proto`
//! descriptors.
//!
//! The generator consumes `FileDescriptorProto`s (the output of
//! `protoc --include_imports -o ...`) and emits one F# source module per
//! protobuf package. Wrapper-typed fields (`google.protobuf.Int32Value` and
//! the other `wrappers.proto` types) are generated as nullable properties
//! backed by shared `FieldCodec` instances, so that field presence survives
//! the wire independently of the wrapped type's default value.
//!
//! The crate is usually driven through the `protoc-gen-fsharp` plugin
//! binary:
//!
//! ```bash
//! protoc --plugin=protoc-gen-fsharp --fsharp_out=src person.proto
//! ```
//!
//! but the library surface can be called directly:
//!
//! ```rust,no_run
//! use prost_types::FileDescriptorSet;
//!
//! let descriptor_set: FileDescriptorSet = unimplemented!();
//! let config = fsharp_codegen::Config::new();
//! let modules = fsharp_codegen::generate(&config, descriptor_set.file);
//! for (module, content) in &modules {
//!     println!("// {}.fs\n{}", module.join("/"), content);
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/fsharp-codegen/0.1.0")]

mod code_generator;
mod fields;
mod ident;
mod message_map;
mod printer;

use std::collections::HashMap;

use prost_types::FileDescriptorProto;

use crate::code_generator::{module, CodeGenerator};
use crate::message_map::MessageMap;

/// A generated module path: one PascalCase segment per protobuf package
/// segment.
pub type Module = Vec<String>;

/// Configuration options for F# code generation.
#[derive(Default)]
pub struct Config {
    internal_access: bool,
}

impl Config {
    /// Creates a new code generation configuration with default options.
    pub fn new() -> Config {
        Config::default()
    }

    /// Generates members with `internal` instead of `public` visibility.
    pub fn internal_access(&mut self, enabled: bool) -> &mut Config {
        self.internal_access = enabled;
        self
    }

    pub(crate) fn access_level(&self) -> &'static str {
        if self.internal_access {
            "internal"
        } else {
            "public"
        }
    }
}

/// Generates F# source for each file in `files`, returning the output keyed
/// by module path.
///
/// `files` must carry every transitively imported definition
/// (`protoc --include_imports`), since wrapper fields are resolved through
/// their message descriptors.
pub fn generate(config: &Config, files: Vec<FileDescriptorProto>) -> HashMap<Module, String> {
    let mut modules = HashMap::new();

    let messages = MessageMap::new(files.iter());

    for file in files {
        // The well-known wrapper definitions ship with the F# runtime
        // library; only user packages are generated.
        if file.package() == "google.protobuf" {
            continue;
        }

        let module = module(&file);
        let buf = modules.entry(module).or_insert_with(String::new);
        CodeGenerator::generate(config, &messages, file, buf);
    }

    modules
}
