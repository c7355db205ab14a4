//! XML writer for export operations
//!
//! Produces a `categories` document with one `category` element per category
//! and a nested `products` element per category. Fields are written either
//! as child elements or as attributes, depending on [`MarkupEncoding`].

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use crate::config::{ExportFormat, MarkupEncoding};
use crate::error::{NorthwindError, Result};
use crate::model::{Category, Product};

use super::{FormatWriter, format_bool, format_cost, format_stock};

const ROOT: &str = "categories";

/// Writer for XML format
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
    encoding: MarkupEncoding,
    written: usize,
}

impl XmlWriter {
    /// Create a new XML writer
    ///
    /// # Arguments
    /// * `encoding` - Child elements or attributes for entity fields
    /// * `indent` - Spaces per nesting level
    pub fn new(encoding: MarkupEncoding, indent: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', indent),
            encoding,
            written: 0,
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(xml_error)
    }

    fn start_element(&mut self, name: &str) -> Result<()> {
        self.event(Event::Start(BytesStart::new(name)))
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// `<name>value</name>`, or `<name/>` for an empty value
    fn write_element(&mut self, name: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return self.event(Event::Empty(BytesStart::new(name)));
        }
        self.start_element(name)?;
        self.event(Event::Text(BytesText::new(value)))?;
        self.end_element(name)
    }

    /// Open an entity element carrying `fields` in the configured encoding.
    ///
    /// With `has_children == false` under attribute encoding the element is
    /// self-closing and must not be ended.
    fn open_entity(
        &mut self,
        name: &str,
        fields: &[(&str, String)],
        has_children: bool,
    ) -> Result<()> {
        match self.encoding {
            MarkupEncoding::Attributes => {
                let mut start = BytesStart::new(name);
                for (key, value) in fields {
                    start.push_attribute((*key, value.as_str()));
                }
                if has_children {
                    self.event(Event::Start(start))
                } else {
                    self.event(Event::Empty(start))
                }
            }
            MarkupEncoding::Elements => {
                self.start_element(name)?;
                for (key, value) in fields {
                    self.write_element(key, value)?;
                }
                Ok(())
            }
        }
    }

    fn write_product(&mut self, product: &Product) -> Result<()> {
        let fields = [
            ("id", product.id.to_string()),
            ("name", product.name.clone()),
            ("cost", format_cost(product)?),
            ("stock", format_stock(product)),
            ("discontinued", format_bool(product.discontinued).to_string()),
        ];

        match self.encoding {
            MarkupEncoding::Attributes => self.open_entity("product", &fields, false),
            MarkupEncoding::Elements => {
                self.open_entity("product", &fields, true)?;
                self.end_element("product")
            }
        }
    }
}

impl FormatWriter for XmlWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xml
    }

    fn file_name(&self) -> String {
        format!("categories-and-products-using-{}.xml", self.encoding.label())
    }

    fn begin(&mut self) -> Result<()> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.start_element(ROOT)
    }

    fn write_category(&mut self, category: &Category) -> Result<usize> {
        let fields = [
            ("id", category.id.to_string()),
            ("name", category.name.clone()),
            ("desc", category.description_or_empty().to_string()),
            ("product_count", category.product_count().to_string()),
        ];
        self.open_entity("category", &fields, true)?;

        if category.products.is_empty() {
            self.event(Event::Empty(BytesStart::new("products")))?;
        } else {
            self.start_element("products")?;
            for product in &category.products {
                self.write_product(product)?;
            }
            self.end_element("products")?;
        }

        self.end_element("category")?;

        self.written += 1;
        Ok(category.product_count())
    }

    fn finalize(&mut self) -> Result<Vec<u8>> {
        self.end_element(ROOT)?;
        debug!("Finalized XML document ({} categories)", self.written);
        Ok(std::mem::take(self.writer.get_mut()))
    }
}

fn xml_error(err: impl std::fmt::Display) -> NorthwindError {
    NorthwindError::Serialization(format!("XML: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn render(encoding: MarkupEncoding, categories: &[Category]) -> Result<String> {
        let mut writer = XmlWriter::new(encoding, 2);
        writer.begin()?;
        for category in categories {
            writer.write_category(category)?;
        }
        let bytes = writer.finalize()?;
        Ok(String::from_utf8(bytes).unwrap())
    }

    fn beverages() -> Category {
        Category::new(1, "Beverages").with_products(vec![
            Product::new(1, "Chai", 1)
                .with_cost(Decimal::new(1800, 2))
                .with_stock(39),
        ])
    }

    #[test]
    fn test_xml_elements() {
        let xml = render(MarkupEncoding::Elements, &[beverages()]).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains("<categories>"));
        assert!(xml.contains("<name>Beverages</name>"));
        assert!(xml.contains("<desc/>"));
        assert!(xml.contains("<product_count>1</product_count>"));
        assert!(xml.contains("<cost>18.00</cost>"));
        assert!(xml.contains("<stock>39</stock>"));
        assert!(xml.contains("<discontinued>False</discontinued>"));
        assert!(xml.trim_end().ends_with("</categories>"));
    }

    #[test]
    fn test_xml_attributes() {
        let xml = render(MarkupEncoding::Attributes, &[beverages()]).unwrap();

        assert!(xml.contains(r#"<category id="1" name="Beverages" desc="" product_count="1">"#));
        assert!(xml.contains(
            r#"<product id="1" name="Chai" cost="18.00" stock="39" discontinued="False"/>"#
        ));
        assert!(!xml.contains("<name>"));
    }

    #[test]
    fn test_xml_empty_category() {
        let empty = Category::new(9, "Empty").with_products(Vec::new());
        let xml = render(MarkupEncoding::Elements, &[empty]).unwrap();
        assert!(xml.contains("<product_count>0</product_count>"));
        assert!(xml.contains("<products/>"));
        assert!(!xml.contains("<product>"));
    }

    #[test]
    fn test_xml_empty_category_attributes() {
        let empty = Category::new(9, "Empty").with_products(Vec::new());
        let xml = render(MarkupEncoding::Attributes, &[empty]).unwrap();
        assert!(xml.contains(r#"<category id="9" name="Empty" desc="" product_count="0">"#));
        assert!(xml.contains("<products/>"));
        assert!(xml.contains("</category>"));
        assert!(!xml.contains("<product "));
    }

    #[test]
    fn test_xml_missing_stock_is_empty() {
        let category = Category::new(1, "Beverages").with_products(vec![
            Product::new(1, "Chai", 1).with_cost(Decimal::new(1800, 2)),
        ]);
        let xml = render(MarkupEncoding::Elements, &[category.clone()]).unwrap();
        assert!(xml.contains("<stock/>"));

        let xml = render(MarkupEncoding::Attributes, &[category]).unwrap();
        assert!(xml.contains(r#"stock="""#));
    }

    #[test]
    fn test_xml_escapes_text() {
        let category = Category::new(2, "Condiments")
            .with_description("Sauces & <spreads>")
            .with_products(Vec::new());
        let xml = render(MarkupEncoding::Elements, &[category]).unwrap();
        assert!(xml.contains("<desc>Sauces &amp; &lt;spreads&gt;</desc>"));
    }

    #[test]
    fn test_xml_missing_cost() {
        let category = Category::new(1, "Beverages")
            .with_products(vec![Product::new(1, "Chai", 1)]);
        let err = render(MarkupEncoding::Elements, &[category]).unwrap_err();
        assert!(matches!(err, NorthwindError::DataIntegrity(_)));
    }

    #[test]
    fn test_xml_file_names() {
        let elements = XmlWriter::new(MarkupEncoding::Elements, 2);
        let attributes = XmlWriter::new(MarkupEncoding::Attributes, 2);
        assert_eq!(elements.file_name(), "categories-and-products-using-elements.xml");
        assert_eq!(attributes.file_name(), "categories-and-products-using-attributes.xml");
    }
}
