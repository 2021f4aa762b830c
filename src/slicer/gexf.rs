//! Wire types for the graph-exchange XML document (GEXF 1.3), and their
//! conversion into the slicer's internal element records.
//!
//! Parsing goes through `quick_xml`'s serde integration: attributes are
//! `@name`-prefixed fields, and unknown elements/attributes are silently
//! ignored (forward compatibility), except the handful this module validates
//! explicitly.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename = "gexf")]
pub struct GexfDocument {
	#[serde(rename = "@version", default)]
	pub version: String,
	pub graph: GraphXml,
}

#[derive(Debug, Deserialize)]
pub struct GraphXml {
	#[serde(rename = "@mode", default)]
	pub mode: String,
	#[serde(rename = "@timeformat", default)]
	pub timeformat: String,
	#[serde(rename = "@timerepresentation", default)]
	pub timerepresentation: String,
	#[serde(rename = "attributes", default)]
	pub attributes: Vec<AttributesXml>,
	pub nodes: NodesXml,
	#[serde(default)]
	pub edges: Option<EdgesXml>,
}

#[derive(Debug, Deserialize)]
pub struct AttributesXml {
	#[serde(rename = "@class")]
	pub class: String,
	#[serde(rename = "@mode", default)]
	pub mode: String,
	#[serde(rename = "attribute", default)]
	pub attribute: Vec<AttributeXml>,
}

#[derive(Debug, Deserialize)]
pub struct AttributeXml {
	#[serde(rename = "@id")]
	pub id: String,
	#[serde(rename = "@title", default)]
	pub title: String,
	#[serde(rename = "@type", default)]
	pub ty: String,
	#[serde(default)]
	pub default: Option<DefaultXml>,
}

#[derive(Debug, Deserialize)]
pub struct DefaultXml {
	#[serde(rename = "$text", default)]
	pub value: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct NodesXml {
	#[serde(rename = "node", default)]
	pub node: Vec<NodeXml>,
}

#[derive(Debug, Deserialize)]
pub struct NodeXml {
	#[serde(rename = "@id")]
	pub id: String,
	#[serde(rename = "@label", default)]
	pub label: String,
	#[serde(rename = "@start", default)]
	pub start: Option<String>,
	#[serde(rename = "@end", default)]
	pub end: Option<String>,
	#[serde(rename = "@timestamp", default)]
	pub timestamp: Option<String>,
	#[serde(default)]
	pub spells: Option<SpellsXml>,
	#[serde(default)]
	pub attvalues: Option<AttvaluesXml>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SpellsXml {
	#[serde(rename = "spell", default)]
	pub spell: Vec<SpellXml>,
}

#[derive(Debug, Deserialize)]
pub struct SpellXml {
	#[serde(rename = "@start", default)]
	pub start: Option<String>,
	#[serde(rename = "@end", default)]
	pub end: Option<String>,
	#[serde(rename = "@timestamp", default)]
	pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AttvaluesXml {
	#[serde(rename = "attvalue", default)]
	pub attvalue: Vec<AttvalueXml>,
}

#[derive(Debug, Deserialize)]
pub struct AttvalueXml {
	#[serde(rename = "@for")]
	pub for_: String,
	#[serde(rename = "@value", default)]
	pub value: String,
	#[serde(rename = "@start", default)]
	pub start: Option<String>,
	#[serde(rename = "@end", default)]
	pub end: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EdgesXml {
	#[serde(rename = "edge", default)]
	pub edge: Vec<EdgeXml>,
}

#[derive(Debug, Deserialize)]
pub struct EdgeXml {
	#[serde(rename = "@id", default)]
	pub id: String,
	#[serde(rename = "@source")]
	pub source: String,
	#[serde(rename = "@target")]
	pub target: String,
	#[serde(rename = "@type", default)]
	pub ty: String,
	#[serde(rename = "@start", default)]
	pub start: Option<String>,
	#[serde(rename = "@end", default)]
	pub end: Option<String>,
	#[serde(rename = "@timestamp", default)]
	pub timestamp: Option<String>,
	#[serde(default)]
	pub spells: Option<SpellsXml>,
	#[serde(default)]
	pub attvalues: Option<AttvaluesXml>,
}

impl GexfDocument {
	pub fn parse(xml: &str) -> Result<Self, quick_xml::DeError> {
		quick_xml::de::from_str(xml)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"
		<gexf version="1.3">
		  <graph mode="dynamic" timeformat="integer" timerepresentation="interval">
		    <attributes class="node" mode="static">
		      <attribute id="0" title="kind" type="string"/>
		    </attributes>
		    <nodes>
		      <node id="a" label="Alpha" start="0" end="10">
		        <attvalues>
		          <attvalue for="0" value="hub"/>
		        </attvalues>
		      </node>
		      <node id="b" label="Beta" start="5" end="15"/>
		    </nodes>
		    <edges>
		      <edge id="e0" source="a" target="b" start="5" end="10"/>
		    </edges>
		  </graph>
		</gexf>
	"#;

	#[test]
	fn parses_minimal_dynamic_document() {
		let doc = GexfDocument::parse(SAMPLE).unwrap();
		assert_eq!(doc.version, "1.3");
		assert_eq!(doc.graph.mode, "dynamic");
		assert_eq!(doc.graph.nodes.node.len(), 2);
		assert_eq!(doc.graph.edges.unwrap().edge.len(), 1);
	}
}
