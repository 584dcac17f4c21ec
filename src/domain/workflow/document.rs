//! Workflow document entity and structural validation

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// One node of a workflow document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    /// Operation identifier in the form `<tool>.<operation>`
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

impl WorkflowNode {
    /// The tool segment of the node's operation identifier
    pub fn tool_prefix(&self) -> &str {
        self.node_type.split('.').next().unwrap_or(&self.node_type)
    }
}

/// Outgoing connection(s) of a node.
///
/// Generators emit either `{"next": "node2"}` or a bare node id; both wire
/// forms are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeConnection {
    Next { next: String },
    Direct(String),
}

impl NodeConnection {
    /// Target node ids of this connection
    pub fn targets(&self) -> Vec<&str> {
        match self {
            Self::Next { next } => vec![next.as_str()],
            Self::Direct(target) => vec![target.as_str()],
        }
    }
}

/// The structured node-and-connection representation of an automation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkflowDocument {
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub connections: HashMap<String, NodeConnection>,
}

/// Structural defects of a workflow document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentDefect {
    NoNodes,
    MissingNodeId { index: usize },
    DuplicateNodeId { id: String },
    InvalidNodeType { id: String, node_type: String },
    UnknownConnectionSource { id: String },
    UnknownConnectionTarget { source: String, target: String },
}

impl fmt::Display for DocumentDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNodes => write!(f, "Workflow must have at least one node"),
            Self::MissingNodeId { index } => {
                write!(f, "Node at index {} has an empty id", index)
            }
            Self::DuplicateNodeId { id } => write!(f, "Duplicate node id '{}'", id),
            Self::InvalidNodeType { id, node_type } => {
                write!(
                    f,
                    "Node '{}' has invalid type '{}' (expected '<tool>.<operation>')",
                    id, node_type
                )
            }
            Self::UnknownConnectionSource { id } => {
                write!(f, "Connection references unknown source node '{}'", id)
            }
            Self::UnknownConnectionTarget { source, target } => {
                write!(
                    f,
                    "Connection from '{}' references unknown target node '{}'",
                    source, target
                )
            }
        }
    }
}

impl WorkflowDocument {
    /// Check the structural invariants: at least one node, unique node ids,
    /// namespaced node types, and connections referencing existing nodes.
    pub fn validate_structure(&self) -> Result<(), DocumentDefect> {
        if self.nodes.is_empty() {
            return Err(DocumentDefect::NoNodes);
        }

        let mut node_ids: HashSet<&str> = HashSet::with_capacity(self.nodes.len());

        for (index, node) in self.nodes.iter().enumerate() {
            if node.id.is_empty() {
                return Err(DocumentDefect::MissingNodeId { index });
            }

            if !node_ids.insert(node.id.as_str()) {
                return Err(DocumentDefect::DuplicateNodeId {
                    id: node.id.clone(),
                });
            }

            let mut segments = node.node_type.splitn(2, '.');
            let tool = segments.next().unwrap_or("");
            let operation = segments.next().unwrap_or("");

            if tool.is_empty() || operation.is_empty() {
                return Err(DocumentDefect::InvalidNodeType {
                    id: node.id.clone(),
                    node_type: node.node_type.clone(),
                });
            }
        }

        for (source, connection) in &self.connections {
            if !node_ids.contains(source.as_str()) {
                return Err(DocumentDefect::UnknownConnectionSource { id: source.clone() });
            }

            for target in connection.targets() {
                if !node_ids.contains(target) {
                    return Err(DocumentDefect::UnknownConnectionTarget {
                        source: source.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Distinct tool prefixes referenced by the document's nodes
    pub fn tool_prefixes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .map(|node| node.tool_prefix())
            .filter(|prefix| seen.insert(*prefix))
            .collect()
    }
}

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Build a node with the given id and type, for tests
    pub fn node(id: &str, node_type: &str) -> WorkflowNode {
        WorkflowNode {
            id: id.to_string(),
            node_type: node_type.to_string(),
            display_name: None,
            parameters: serde_json::Map::new(),
        }
    }

    /// Build a single-node document, for tests
    pub fn single_node_document(node_type: &str) -> WorkflowDocument {
        WorkflowDocument {
            nodes: vec![node("node1", node_type)],
            connections: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::node;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_original_wire_shape() {
        let raw = json!({
            "nodes": [
                {
                    "id": "node1",
                    "type": "webhook.incoming",
                    "displayName": "Incoming Webhook",
                    "parameters": {}
                },
                {
                    "id": "node2",
                    "type": "gmail.send-email",
                    "displayName": "Send Email",
                    "parameters": {"to": "user@example.com"}
                }
            ],
            "connections": {
                "node1": {"next": "node2"}
            }
        });

        let document: WorkflowDocument = serde_json::from_value(raw).unwrap();

        assert_eq!(document.nodes.len(), 2);
        assert_eq!(document.nodes[1].tool_prefix(), "gmail");
        assert!(document.validate_structure().is_ok());
    }

    #[test]
    fn test_bare_string_connection_is_accepted() {
        let raw = json!({
            "nodes": [
                {"id": "a", "type": "webhook.incoming"},
                {"id": "b", "type": "slack.send-message"}
            ],
            "connections": {"a": "b"}
        });

        let document: WorkflowDocument = serde_json::from_value(raw).unwrap();

        assert!(document.validate_structure().is_ok());
        assert_eq!(document.connections["a"].targets(), vec!["b"]);
    }

    #[test]
    fn test_empty_document_is_invalid() {
        let document = WorkflowDocument::default();

        assert_eq!(document.validate_structure(), Err(DocumentDefect::NoNodes));
    }

    #[test]
    fn test_duplicate_node_ids_rejected() {
        let document = WorkflowDocument {
            nodes: vec![node("node1", "gmail.send-email"), node("node1", "slack.send-message")],
            connections: HashMap::new(),
        };

        assert_eq!(
            document.validate_structure(),
            Err(DocumentDefect::DuplicateNodeId { id: "node1".into() })
        );
    }

    #[test]
    fn test_node_type_without_separator_rejected() {
        let document = WorkflowDocument {
            nodes: vec![node("node1", "gmail")],
            connections: HashMap::new(),
        };

        assert!(matches!(
            document.validate_structure(),
            Err(DocumentDefect::InvalidNodeType { .. })
        ));
    }

    #[test]
    fn test_connection_to_unknown_node_rejected() {
        let mut connections = HashMap::new();
        connections.insert(
            "node1".to_string(),
            NodeConnection::Next {
                next: "ghost".to_string(),
            },
        );
        let document = WorkflowDocument {
            nodes: vec![node("node1", "gmail.send-email")],
            connections,
        };

        assert_eq!(
            document.validate_structure(),
            Err(DocumentDefect::UnknownConnectionTarget {
                source: "node1".into(),
                target: "ghost".into(),
            })
        );
    }

    #[test]
    fn test_connection_from_unknown_node_rejected() {
        let mut connections = HashMap::new();
        connections.insert("ghost".to_string(), NodeConnection::Direct("node1".to_string()));
        let document = WorkflowDocument {
            nodes: vec![node("node1", "gmail.send-email")],
            connections,
        };

        assert_eq!(
            document.validate_structure(),
            Err(DocumentDefect::UnknownConnectionSource { id: "ghost".into() })
        );
    }

    #[test]
    fn test_tool_prefixes_deduplicated_in_node_order() {
        let document = WorkflowDocument {
            nodes: vec![
                node("n1", "gmail.send-email"),
                node("n2", "gmail.read-email"),
                node("n3", "slack.send-message"),
            ],
            connections: HashMap::new(),
        };

        assert_eq!(document.tool_prefixes(), vec!["gmail", "slack"]);
    }
}
