//! Tree rendering for bone hierarchies

use console::Style;
use std::collections::BTreeMap;

use anim_pose::SkeletonDefinition;

/// Represents a node in a tree structure
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub children: Vec<TreeNode>,
    pub metadata: BTreeMap<String, String>,
}

/// Types of nodes in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// The skeleton itself
    Root,
    /// Bone with children
    Joint,
    /// Bone without children
    EndBone,
}

/// Options for tree rendering
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_metadata: bool,
}

impl TreeNode {
    /// Create a new tree node
    pub fn new(name: String, node_type: NodeType) -> Self {
        Self {
            name,
            node_type,
            children: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }
}

impl NodeType {
    /// Get icon for node type
    pub fn icon(self) -> &'static str {
        match self {
            NodeType::Root => "🦴",
            NodeType::Joint => "◆",
            NodeType::EndBone => "◇",
        }
    }

    /// Get color style for node type
    pub fn style(self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                NodeType::Root => Style::new().bold().cyan(),
                NodeType::Joint => Style::new().green(),
                NodeType::EndBone => Style::new().yellow(),
            }
        }
    }
}

/// Build the bone hierarchy of a skeleton definition
///
/// Bones whose parent chain never reaches a root are left out.
pub fn skeleton_tree(name: &str, definition: &SkeletonDefinition) -> TreeNode {
    let count = definition.bones.len();
    let mut children = vec![Vec::new(); count];
    let mut roots = Vec::new();
    for (index, bone) in definition.bones.iter().enumerate() {
        match bone.parent_index {
            Some(parent) if parent < count && parent != index => children[parent].push(index),
            Some(_) => {}
            None => roots.push(index),
        }
    }

    let mut root = TreeNode::new(name.to_string(), NodeType::Root)
        .with_metadata("bones", &count.to_string());
    for index in roots {
        root = root.add_child(bone_node(definition, &children, index));
    }
    root
}

fn bone_node(definition: &SkeletonDefinition, children: &[Vec<usize>], index: usize) -> TreeNode {
    let bone = &definition.bones[index];
    let node_type = if children[index].is_empty() {
        NodeType::EndBone
    } else {
        NodeType::Joint
    };
    let p = bone.bind_pose.position;

    let mut node = TreeNode::new(format!("[{index}] {}", bone.name), node_type)
        .with_metadata("position", &format!("({:.3}, {:.3}, {:.3})", p.x, p.y, p.z));
    for &child in &children[index] {
        node = node.add_child(bone_node(definition, children, child));
    }
    node
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let style = node.node_type.style(options.no_color);
    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    output.push_str(&format!(
        "{}{}{} {}",
        prefix,
        connector,
        node.node_type.icon(),
        style.apply_to(&node.name)
    ));

    if options.show_metadata && !node.metadata.is_empty() {
        let meta_style = Style::new().dim();
        let parts: Vec<String> = node
            .metadata
            .iter()
            .map(|(key, value)| format!("{}: {value}", meta_style.apply_to(key)))
            .collect();
        output.push_str(&format!(" [{}]", parts.join(", ")));
    }
    output.push('\n');

    let new_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}{}", prefix, if is_last { "    " } else { "│   " })
    };

    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == node.children.len() - 1;
        render_node(
            child,
            output,
            &new_prefix,
            is_last_child,
            depth + 1,
            options,
        );
    }
}
