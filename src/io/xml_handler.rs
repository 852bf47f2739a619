use crate::prelude::*;
use log::warn;
use roxmltree::Node;
use std::path::Path;
use thiserror::Error;

/// Reader of legacy HOOMD XML files.
///
/// The file contains a single `<configuration>` inside the `<hoomd_xml>` root.
/// Elements `box`, `position`, `type`, `mass` and `charge` are required,
/// bonded terms (`bond`, `angle`, `dihedral`, `improper`) are optional.
pub struct XmlFileHandler {
    content: String,
}

#[derive(Debug, Error)]
pub enum XmlHandlerError {
    #[error("can't open xml file for reading")]
    OpenRead(#[source] std::io::Error),

    #[error("malformed xml")]
    Xml(#[from] roxmltree::Error),

    #[error("no <configuration> element")]
    NoConfiguration,

    #[error("no <{0}> element")]
    MissingElement(&'static str),

    #[error("no attribute '{1}' in <{0}>")]
    MissingAttribute(&'static str, &'static str),

    #[error("invalid value '{1}' in <{0}>")]
    InvalidValue(&'static str, String),

    #[error("<{element}> has {found} entries, {expected} expected")]
    WrongCount {
        element: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("<{0}> has {1} tokens, which is not a multiple of {2}")]
    IncompleteGroup(&'static str, usize, usize),
}

impl XmlFileHandler {
    pub fn open(fname: impl AsRef<Path>) -> Result<Self, XmlHandlerError> {
        Ok(Self {
            content: std::fs::read_to_string(fname).map_err(XmlHandlerError::OpenRead)?,
        })
    }

    /// Handler for xml text which is already in memory
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn read(&mut self, frame: usize) -> Result<SystemStorage, XmlHandlerError> {
        if frame > 0 {
            warn!("xml file contains a single configuration, frame {frame} is ignored");
        }
        let doc = roxmltree::Document::parse(&self.content)?;
        let config = child(doc.root_element(), "configuration")
            .ok_or_else(|| XmlHandlerError::NoConfiguration)?;

        let mut st = SystemStorage::default();

        // Box
        let el = required(config, "box")?;
        st.sim_box = SimBox::new(
            attr(el, "box", "Lx")?,
            attr(el, "box", "Ly")?,
            attr(el, "box", "Lz")?,
        )
        .with_tilts(
            opt_attr(el, "box", "xy")?.unwrap_or(0.0),
            opt_attr(el, "box", "xz")?.unwrap_or(0.0),
            opt_attr(el, "box", "yz")?.unwrap_or(0.0),
        );

        // Positions define the number of particles
        let el = required(config, "position")?;
        let num_str = el
            .attribute("num")
            .ok_or_else(|| XmlHandlerError::MissingAttribute("position", "num"))?;
        let num = num_str
            .trim()
            .parse::<usize>()
            .map_err(|_| XmlHandlerError::InvalidValue("position", num_str.to_owned()))?;
        let n_coords = num
            .checked_mul(3)
            .ok_or_else(|| XmlHandlerError::InvalidValue("position", num_str.to_owned()))?;
        let coords = floats(el, "position")?;
        check_count("position", n_coords, coords.len())?;
        st.positions = coords
            .chunks_exact(3)
            .map(|c| Pos::new(c[0], c[1], c[2]))
            .collect();

        st.types = tokens(required(config, "type")?)
            .into_iter()
            .map(|s| s.to_owned())
            .collect();
        check_count("type", num, st.types.len())?;

        st.masses = floats(required(config, "mass")?, "mass")?;
        check_count("mass", num, st.masses.len())?;

        st.charges = floats(required(config, "charge")?, "charge")?;
        check_count("charge", num, st.charges.len())?;

        // Bonded terms
        st.bonds = terms(config, "bond")?;
        st.angles = terms(config, "angle")?;
        st.dihedrals = terms(config, "dihedral")?;
        st.impropers = terms(config, "improper")?;

        Ok(st)
    }
}

fn child<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.children().find(|n| n.is_element() && n.has_tag_name(name))
}

fn required<'a, 'i>(node: Node<'a, 'i>, name: &'static str) -> Result<Node<'a, 'i>, XmlHandlerError> {
    child(node, name).ok_or_else(|| XmlHandlerError::MissingElement(name))
}

fn opt_attr(
    node: Node,
    element: &'static str,
    name: &'static str,
) -> Result<Option<f32>, XmlHandlerError> {
    node.attribute(name)
        .map(|s| {
            s.trim()
                .parse::<f32>()
                .map_err(|_| XmlHandlerError::InvalidValue(element, s.to_owned()))
        })
        .transpose()
}

fn attr(node: Node, element: &'static str, name: &'static str) -> Result<f32, XmlHandlerError> {
    opt_attr(node, element, name)?.ok_or_else(|| XmlHandlerError::MissingAttribute(element, name))
}

// Whitespace-separated tokens from all text inside the element
fn tokens<'a>(node: Node<'a, '_>) -> Vec<&'a str> {
    node.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .flat_map(|t| t.split_whitespace())
        .collect()
}

fn floats(node: Node, element: &'static str) -> Result<Vec<f32>, XmlHandlerError> {
    tokens(node)
        .into_iter()
        .map(|s| {
            s.parse::<f32>()
                .map_err(|_| XmlHandlerError::InvalidValue(element, s.to_owned()))
        })
        .collect()
}

fn terms<const N: usize>(
    config: Node,
    element: &'static str,
) -> Result<Vec<TopologyTerm<N>>, XmlHandlerError> {
    let Some(el) = child(config, element) else {
        return Ok(vec![]);
    };

    let tok = tokens(el);
    if tok.len() % (N + 1) != 0 {
        return Err(XmlHandlerError::IncompleteGroup(element, tok.len(), N + 1));
    }

    tok.chunks_exact(N + 1)
        .map(|group| {
            let mut ind = [0; N];
            for (i, s) in ind.iter_mut().zip(&group[1..]) {
                *i = s
                    .parse::<usize>()
                    .map_err(|_| XmlHandlerError::InvalidValue(element, s.to_string()))?;
            }
            Ok(TopologyTerm::new(group[0], ind))
        })
        .collect()
}

fn check_count(element: &'static str, expected: usize, found: usize) -> Result<(), XmlHandlerError> {
    if expected != found {
        Err(XmlHandlerError::WrongCount {
            element,
            expected,
            found,
        })
    } else {
        Ok(())
    }
}
