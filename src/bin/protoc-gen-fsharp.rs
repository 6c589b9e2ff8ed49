use std::io::{self, Read, Write};
use std::path::PathBuf;

use bytes::Bytes;
use prost::Message;
use prost_types::compiler::{code_generator_response, CodeGeneratorRequest, CodeGeneratorResponse};

fn main() {
    env_logger::init();

    let mut bytes = Vec::new();
    io::stdin().read_to_end(&mut bytes).unwrap();
    assert_ne!(0, bytes.len());

    let request = CodeGeneratorRequest::decode(Bytes::from(bytes)).unwrap();

    let config = fsharp_codegen::Config::new();
    let modules = fsharp_codegen::generate(&config, request.proto_file);

    let mut response = CodeGeneratorResponse {
        supported_features: Some(code_generator_response::Feature::Proto3Optional as u64),
        ..Default::default()
    };

    for (module, content) in modules {
        let mut path = module.into_iter().collect::<PathBuf>();
        if path.iter().count() == 0 {
            path.push("Generated");
        }
        path.set_extension("fs");

        response.file.push(code_generator_response::File {
            name: Some(path.to_string_lossy().into_owned()),
            content: Some(content),
            ..Default::default()
        });
    }

    let mut out = Vec::new();
    response.encode(&mut out).unwrap();
    io::stdout().write_all(&out).unwrap();
}
