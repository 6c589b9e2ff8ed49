use std::collections::HashMap;

use prost_types::{DescriptorProto, FileDescriptorProto};

/// `MessageMap` indexes every message type in the input files by its
/// fully-qualified name, so that field generators can inspect the message
/// type a field refers to.
pub struct MessageMap {
    messages: HashMap<String, DescriptorProto>,
}

impl MessageMap {
    pub fn new<'a>(files: impl Iterator<Item = &'a FileDescriptorProto>) -> MessageMap {
        let mut map = MessageMap {
            messages: HashMap::new(),
        };

        for file in files {
            let package = format!(
                "{}{}",
                if file.package.is_some() { "." } else { "" },
                file.package.as_ref().map(String::as_str).unwrap_or("")
            );
            for msg in &file.message_type {
                map.add_message(&package, msg);
            }
        }

        map
    }

    fn add_message(&mut self, package: &str, msg: &DescriptorProto) {
        let msg_name = format!("{}.{}", package, msg.name.as_ref().unwrap());

        for msg in &msg.nested_type {
            self.add_message(&msg_name, msg);
        }

        self.messages.insert(msg_name, msg.clone());
    }

    /// Looks up a message type by fully-qualified name. protoc always hands
    /// out fully qualified references, so a leading dot is required.
    pub fn get(&self, fq_message_name: &str) -> Option<&DescriptorProto> {
        assert_eq!(b'.', fq_message_name.as_bytes()[0]);
        self.messages.get(fq_message_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_nested_messages() {
        let file = FileDescriptorProto {
            package: Some("example".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Outer".to_string()),
                nested_type: vec![DescriptorProto {
                    name: Some("Inner".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };

        let files = [file];
        let map = MessageMap::new(files.iter());
        assert!(map.get(".example.Outer").is_some());
        assert!(map.get(".example.Outer.Inner").is_some());
        assert!(map.get(".example.Missing").is_none());
    }

    #[test]
    #[should_panic]
    fn relative_lookups_are_rejected() {
        let files: Vec<FileDescriptorProto> = Vec::new();
        let map = MessageMap::new(files.iter());
        map.get("example.Outer");
    }
}
