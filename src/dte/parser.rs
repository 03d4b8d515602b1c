use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use rust_decimal::Decimal;

use crate::dte::types::{
    ExtractedDocument, ExtractedHeader, ExtractedIssuer, ExtractedLineItem, ExtractedReceiver,
    ExtractedReference, ExtractedTotals,
};
use crate::errors::ServiceError;

/// Normalizes a tax id: dots and spaces stripped, a single hyphen ensured
/// before the check digit.
pub fn normalize_tax_id(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| *c != '.' && *c != ' ').collect();
    if cleaned.contains('-') {
        return cleaned;
    }
    let mut chars = cleaned.chars();
    match chars.next_back() {
        Some(check_digit) if !chars.as_str().is_empty() => {
            format!("{}-{check_digit}", chars.as_str())
        }
        _ => cleaned,
    }
}

fn parse_date(text: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text?.trim(), "%Y-%m-%d").ok()
}

fn parse_decimal(text: &str, field: &str) -> Result<Decimal, ServiceError> {
    text.trim()
        .parse::<Decimal>()
        .map_err(|_| ServiceError::ValidationError(format!("invalid numeric value for {field}: {text}")))
}

fn parse_line_number(text: &str, field: &str) -> Result<i32, ServiceError> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| ServiceError::ValidationError(format!("invalid line number for {field}: {text}")))
}

fn set_if_empty(slot: &mut Option<String>, text: &str) {
    if slot.is_none() && !text.is_empty() {
        *slot = Some(text.to_string());
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    IdDoc,
    Issuer,
    Receiver,
    Totals,
}

#[derive(Default)]
struct IssuerBuilder {
    tax_id: Option<String>,
    legal_name: Option<String>,
    legal_name_alt: Option<String>,
    activity: Option<String>,
    activity_alt: Option<String>,
    activity_codes: Vec<String>,
    branch_code: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    street_address: Option<String>,
    commune: Option<String>,
    city: Option<String>,
}

impl IssuerBuilder {
    fn field(&mut self, leaf: &str, text: &str) {
        match leaf {
            "RUTEmisor" => set_if_empty(&mut self.tax_id, text),
            "RznSoc" => set_if_empty(&mut self.legal_name, text),
            "RznSocEmisor" => set_if_empty(&mut self.legal_name_alt, text),
            "GiroEmis" => set_if_empty(&mut self.activity, text),
            "GiroEmisor" => set_if_empty(&mut self.activity_alt, text),
            "Acteco" => {
                if self.activity_codes.len() < 4 && !text.is_empty() {
                    self.activity_codes.push(text.to_string());
                }
            }
            "CdgSIISucur" => set_if_empty(&mut self.branch_code, text),
            "Telefono" => set_if_empty(&mut self.phone, text),
            "CorreoEmisor" => set_if_empty(&mut self.email, text),
            "DirOrigen" => set_if_empty(&mut self.street_address, text),
            "CmnaOrigen" => set_if_empty(&mut self.commune, text),
            "CiudadOrigen" => set_if_empty(&mut self.city, text),
            _ => {}
        }
    }

    fn finish(self) -> ExtractedIssuer {
        ExtractedIssuer {
            tax_id: normalize_tax_id(&self.tax_id.unwrap_or_default()),
            legal_name: self.legal_name.or(self.legal_name_alt).unwrap_or_default(),
            business_activity: self.activity.or(self.activity_alt).unwrap_or_default(),
            activity_codes: self.activity_codes,
            branch_code: self.branch_code.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            street_address: self.street_address.unwrap_or_default(),
            commune: self.commune.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
        }
    }
}

#[derive(Default)]
struct ReceiverBuilder {
    tax_id: Option<String>,
    legal_name: Option<String>,
    activity: Option<String>,
    street_address: Option<String>,
    commune: Option<String>,
    city: Option<String>,
    contact: Option<String>,
    email: Option<String>,
}

impl ReceiverBuilder {
    fn field(&mut self, leaf: &str, text: &str) {
        match leaf {
            "RUTRecep" => set_if_empty(&mut self.tax_id, text),
            "RznSocRecep" => set_if_empty(&mut self.legal_name, text),
            "GiroRecep" => set_if_empty(&mut self.activity, text),
            "DirRecep" => set_if_empty(&mut self.street_address, text),
            "CmnaRecep" => set_if_empty(&mut self.commune, text),
            "CiudadRecep" => set_if_empty(&mut self.city, text),
            "Contacto" => set_if_empty(&mut self.contact, text),
            "CorreoRecep" => set_if_empty(&mut self.email, text),
            _ => {}
        }
    }

    fn finish(self) -> ExtractedReceiver {
        ExtractedReceiver {
            tax_id: normalize_tax_id(&self.tax_id.unwrap_or_default()),
            legal_name: self.legal_name.unwrap_or_default(),
            business_activity: self.activity.unwrap_or_default(),
            street_address: self.street_address.unwrap_or_default(),
            commune: self.commune.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            contact: self.contact.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
        }
    }
}

#[derive(Default)]
struct TotalsBuilder {
    net_amount: Option<Decimal>,
    exempt_amount: Option<Decimal>,
    tax_rate: Option<Decimal>,
    tax_amount: Option<Decimal>,
    total_amount: Option<Decimal>,
}

impl TotalsBuilder {
    fn field(&mut self, leaf: &str, text: &str) -> Result<(), ServiceError> {
        let slot = match leaf {
            "MntNeto" => &mut self.net_amount,
            "MntExe" => &mut self.exempt_amount,
            "TasaIVA" => &mut self.tax_rate,
            "IVA" => &mut self.tax_amount,
            "MntTotal" => &mut self.total_amount,
            _ => return Ok(()),
        };
        if slot.is_none() {
            *slot = Some(parse_decimal(text, leaf)?);
        }
        Ok(())
    }

    fn finish(self) -> ExtractedTotals {
        ExtractedTotals {
            net_amount: self.net_amount.unwrap_or_default(),
            exempt_amount: self.exempt_amount.unwrap_or_default(),
            tax_rate: self.tax_rate.unwrap_or_else(|| Decimal::from(19)),
            tax_amount: self.tax_amount.unwrap_or_default(),
            total_amount: self.total_amount.unwrap_or_default(),
        }
    }
}

#[derive(Default)]
struct LineItemBuilder {
    line_number: Option<i32>,
    item_code: Option<String>,
    item_code_type: Option<String>,
    name: Option<String>,
    description: Option<String>,
    quantity: Option<Decimal>,
    unit: Option<String>,
    unit_price: Option<Decimal>,
    discount_percent: Option<Decimal>,
    discount_amount: Option<Decimal>,
    line_amount: Option<Decimal>,
}

impl LineItemBuilder {
    fn field(&mut self, leaf: &str, text: &str) -> Result<(), ServiceError> {
        match leaf {
            "NroLinDet" => {
                if self.line_number.is_none() {
                    self.line_number = Some(parse_line_number(text, leaf)?);
                }
            }
            "VlrCodigo" => set_if_empty(&mut self.item_code, text),
            "TpoCodigo" => set_if_empty(&mut self.item_code_type, text),
            "NmbItem" => set_if_empty(&mut self.name, text),
            "DscItem" => set_if_empty(&mut self.description, text),
            "UnmdItem" => set_if_empty(&mut self.unit, text),
            "QtyItem" | "PrcItem" | "DescuentoPct" | "DescuentoMonto" | "MontoItem" => {
                let slot = match leaf {
                    "QtyItem" => &mut self.quantity,
                    "PrcItem" => &mut self.unit_price,
                    "DescuentoPct" => &mut self.discount_percent,
                    "DescuentoMonto" => &mut self.discount_amount,
                    _ => &mut self.line_amount,
                };
                if slot.is_none() {
                    *slot = Some(parse_decimal(text, leaf)?);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self, default_line_number: i32) -> ExtractedLineItem {
        ExtractedLineItem {
            line_number: self.line_number.unwrap_or(default_line_number),
            item_code: self.item_code.unwrap_or_default(),
            item_code_type: self.item_code_type.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            quantity: self.quantity.unwrap_or(Decimal::ONE),
            unit: self.unit.unwrap_or_default(),
            unit_price: self.unit_price.unwrap_or_default(),
            discount_percent: self.discount_percent.unwrap_or_default(),
            discount_amount: self.discount_amount.unwrap_or_default(),
            line_amount: self.line_amount.unwrap_or_default(),
        }
    }
}

#[derive(Default)]
struct ReferenceBuilder {
    line_number: Option<i32>,
    document_type: Option<String>,
    folio: Option<String>,
    date: Option<String>,
    reason_code: Option<String>,
    reason: Option<String>,
}

impl ReferenceBuilder {
    fn field(&mut self, leaf: &str, text: &str) -> Result<(), ServiceError> {
        match leaf {
            "NroLinRef" => {
                if self.line_number.is_none() {
                    self.line_number = Some(parse_line_number(text, leaf)?);
                }
            }
            "TpoDocRef" => set_if_empty(&mut self.document_type, text),
            "FolioRef" => set_if_empty(&mut self.folio, text),
            "FchRef" => set_if_empty(&mut self.date, text),
            "CodRef" => set_if_empty(&mut self.reason_code, text),
            "RazonRef" => set_if_empty(&mut self.reason, text),
            _ => {}
        }
        Ok(())
    }

    fn finish(self, default_line_number: i32) -> ExtractedReference {
        ExtractedReference {
            line_number: self.line_number.unwrap_or(default_line_number),
            document_type: self.document_type.unwrap_or_default(),
            folio: self.folio.unwrap_or_default(),
            date: parse_date(self.date.as_deref()),
            reason_code: self.reason_code.unwrap_or_default(),
            reason: self.reason.unwrap_or_default(),
        }
    }
}

/// Accumulates extraction state while the reader walks the document.
/// Only the first `Documento` subtree is processed; `TED` and `Signature`
/// subtrees are skipped entirely.
#[derive(Default)]
struct DocumentBuilder {
    in_document: bool,
    document_seen: bool,
    in_header: bool,
    header_seen: bool,
    section: Option<Section>,
    skip_depth: usize,
    ignore_depth: usize,

    document_type: Option<String>,
    folio: Option<String>,
    issue_date: Option<String>,
    due_date: Option<String>,
    payment_term_code: Option<String>,

    issuer: IssuerBuilder,
    receiver: ReceiverBuilder,
    totals: TotalsBuilder,

    item: Option<LineItemBuilder>,
    items: Vec<ExtractedLineItem>,
    reference: Option<ReferenceBuilder>,
    references: Vec<ExtractedReference>,
}

impl DocumentBuilder {
    fn start(&mut self, name: &str) {
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return;
        }
        if self.ignore_depth > 0 {
            self.ignore_depth += 1;
            return;
        }
        match name {
            "TED" | "Signature" => self.skip_depth = 1,
            "Documento" => {
                if self.document_seen {
                    self.ignore_depth = 1;
                } else {
                    self.document_seen = true;
                    self.in_document = true;
                }
            }
            _ if !self.in_document => {}
            "Encabezado" => {
                self.in_header = true;
                self.header_seen = true;
            }
            "IdDoc" if self.in_header => self.section = Some(Section::IdDoc),
            "Emisor" if self.in_header => self.section = Some(Section::Issuer),
            "Receptor" if self.in_header => self.section = Some(Section::Receiver),
            "Totales" if self.in_header => self.section = Some(Section::Totals),
            "Detalle" => self.item = Some(LineItemBuilder::default()),
            "Referencia" => self.reference = Some(ReferenceBuilder::default()),
            _ => {}
        }
    }

    fn end(&mut self, name: &str) {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }
        if self.ignore_depth > 0 {
            self.ignore_depth -= 1;
            return;
        }
        match name {
            "Documento" if self.in_document => self.in_document = false,
            "Encabezado" => self.in_header = false,
            "IdDoc" | "Emisor" | "Receptor" | "Totales" => self.section = None,
            "Detalle" => {
                if let Some(item) = self.item.take() {
                    let order = self.items.len() as i32 + 1;
                    self.items.push(item.finish(order));
                }
            }
            "Referencia" => {
                if let Some(reference) = self.reference.take() {
                    let order = self.references.len() as i32 + 1;
                    self.references.push(reference.finish(order));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, leaf: &str, text: &str) -> Result<(), ServiceError> {
        if self.skip_depth > 0 || self.ignore_depth > 0 || !self.in_document {
            return Ok(());
        }
        if let Some(item) = self.item.as_mut() {
            return item.field(leaf, text);
        }
        if let Some(reference) = self.reference.as_mut() {
            return reference.field(leaf, text);
        }
        if !self.in_header {
            return Ok(());
        }
        match self.section {
            Some(Section::IdDoc) => match leaf {
                "TipoDTE" => set_if_empty(&mut self.document_type, text),
                "Folio" => set_if_empty(&mut self.folio, text),
                "FchEmis" => set_if_empty(&mut self.issue_date, text),
                "FchVenc" => set_if_empty(&mut self.due_date, text),
                "FmaPago" => set_if_empty(&mut self.payment_term_code, text),
                _ => {}
            },
            Some(Section::Issuer) => self.issuer.field(leaf, text),
            Some(Section::Receiver) => self.receiver.field(leaf, text),
            Some(Section::Totals) => return self.totals.field(leaf, text),
            None => {}
        }
        Ok(())
    }

    fn finish(self, raw_xml: String) -> Result<ExtractedDocument, ServiceError> {
        if !self.document_seen {
            return Err(ServiceError::ValidationError(
                "Documento element not found in XML".to_string(),
            ));
        }
        if !self.header_seen {
            return Err(ServiceError::ValidationError(
                "Encabezado element not found in XML".to_string(),
            ));
        }

        let header = ExtractedHeader {
            document_type: self.document_type.unwrap_or_default(),
            folio: self.folio.unwrap_or_default(),
            issue_date: parse_date(self.issue_date.as_deref()),
            due_date: parse_date(self.due_date.as_deref()),
            payment_term_code: self.payment_term_code.unwrap_or_default(),
            issuer: self.issuer.finish(),
            receiver: self.receiver.finish(),
            totals: self.totals.finish(),
        };

        Ok(ExtractedDocument {
            header,
            items: self.items,
            references: self.references,
            raw_xml,
        })
    }
}

/// Extracts header, line items and references from DTE XML text.
///
/// Element names are matched on their local part, so plain documents and
/// `sii:`-prefixed authority documents extract identically. Fails with
/// `ParseError` on ill-formed XML and `ValidationError` when the mandatory
/// `Documento`/`Encabezado` elements are missing or a numeric field does
/// not parse.
pub fn parse_document(xml: &str) -> Result<ExtractedDocument, ServiceError> {
    let trimmed = xml.trim();
    let mut reader = Reader::from_str(trimmed);
    reader.config_mut().trim_text(true);

    let mut builder = DocumentBuilder::default();
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                builder.start(&name);
                path.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                builder.start(&name);
                builder.end(&name);
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match path.pop() {
                    Some(open) if open == name => builder.end(&name),
                    Some(open) => {
                        return Err(ServiceError::ParseError(format!(
                            "mismatched closing tag: expected </{open}>, found </{name}>"
                        )))
                    }
                    None => {
                        return Err(ServiceError::ParseError(format!(
                            "unexpected closing tag </{name}>"
                        )))
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| ServiceError::ParseError(format!("invalid XML text: {err}")))?;
                if let Some(leaf) = path.last() {
                    builder.text(leaf, text.trim())?;
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.into_inner().as_ref()).into_owned();
                if let Some(leaf) = path.last() {
                    builder.text(leaf, text.trim())?;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(ServiceError::ParseError(format!("malformed XML: {err}")));
            }
        }
    }

    if let Some(open) = path.last() {
        return Err(ServiceError::ParseError(format!(
            "unexpected end of document inside <{open}>"
        )));
    }

    builder.finish(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const PLAIN_DTE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DTE version="1.0">
  <Documento ID="F1234T33">
    <Encabezado>
      <IdDoc>
        <TipoDTE>33</TipoDTE>
        <Folio>1234</Folio>
        <FchEmis>2024-03-15</FchEmis>
        <FchVenc>2024-04-15</FchVenc>
        <FmaPago>2</FmaPago>
      </IdDoc>
      <Emisor>
        <RUTEmisor>76.543.210-K</RUTEmisor>
        <RznSoc>ACME SPA</RznSoc>
        <GiroEmis>Venta de materiales</GiroEmis>
        <Acteco>466301</Acteco>
        <Acteco>475201</Acteco>
        <Telefono>+56 2 2345 6789</Telefono>
        <CorreoEmisor>ventas@acme.cl</CorreoEmisor>
        <DirOrigen>Av. Industrial 1234</DirOrigen>
        <CmnaOrigen>Quilicura</CmnaOrigen>
        <CiudadOrigen>Santiago</CiudadOrigen>
      </Emisor>
      <Receptor>
        <RUTRecep>77.111.222-3</RUTRecep>
        <RznSocRecep>Constructora Andes Ltda</RznSocRecep>
        <GiroRecep>Construccion</GiroRecep>
        <DirRecep>Calle Larga 45</DirRecep>
        <CmnaRecep>Providencia</CmnaRecep>
        <CiudadRecep>Santiago</CiudadRecep>
      </Receptor>
      <Totales>
        <MntNeto>8000</MntNeto>
        <TasaIVA>19</TasaIVA>
        <IVA>1520</IVA>
        <MntTotal>9520</MntTotal>
      </Totales>
    </Encabezado>
    <Detalle>
      <NroLinDet>1</NroLinDet>
      <CdgItem>
        <TpoCodigo>INT1</TpoCodigo>
        <VlrCodigo>CEM-25</VlrCodigo>
      </CdgItem>
      <NmbItem>Cemento 25kg</NmbItem>
      <QtyItem>3</QtyItem>
      <UnmdItem>SACO</UnmdItem>
      <PrcItem>1000</PrcItem>
      <MontoItem>3000</MontoItem>
    </Detalle>
    <Detalle>
      <NroLinDet>2</NroLinDet>
      <NmbItem>Fierro 8mm</NmbItem>
      <QtyItem>1</QtyItem>
      <PrcItem>5000</PrcItem>
      <MontoItem>5000</MontoItem>
    </Detalle>
    <Referencia>
      <NroLinRef>1</NroLinRef>
      <TpoDocRef>801</TpoDocRef>
      <FolioRef>OC-990</FolioRef>
      <FchRef>2024-03-01</FchRef>
      <RazonRef>Orden de compra</RazonRef>
    </Referencia>
    <TED version="1.0">
      <DD>
        <RE>76543210-K</RE>
        <F>99999</F>
      </DD>
    </TED>
  </Documento>
</DTE>"#;

    fn namespaced_dte() -> String {
        PLAIN_DTE
            .replace("<Documento", "<sii:Documento xmlns:sii=\"http://www.sii.cl/SiiDte\"")
            .replace("</Documento>", "</sii:Documento>")
            .replace("<Encabezado>", "<sii:Encabezado>")
            .replace("</Encabezado>", "</sii:Encabezado>")
            .replace("<Folio>", "<sii:Folio>")
            .replace("</Folio>", "</sii:Folio>")
            .replace("<RUTEmisor>", "<sii:RUTEmisor>")
            .replace("</RUTEmisor>", "</sii:RUTEmisor>")
    }

    #[test]
    fn normalizes_tax_ids() {
        assert_eq!(normalize_tax_id("76.543.210-K"), "76543210-K");
        assert_eq!(normalize_tax_id("76543210K"), "76543210-K");
        assert_eq!(normalize_tax_id("76 543 210-K"), "76543210-K");
        assert_eq!(normalize_tax_id(""), "");
        assert_eq!(normalize_tax_id("7"), "7");
    }

    #[test]
    fn extracts_header_fields() {
        let doc = parse_document(PLAIN_DTE).unwrap();
        let header = &doc.header;

        assert_eq!(header.document_type, "33");
        assert_eq!(header.folio, "1234");
        assert_eq!(header.issue_date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(header.due_date, NaiveDate::from_ymd_opt(2024, 4, 15));
        assert_eq!(header.payment_term_code, "2");

        assert_eq!(header.issuer.tax_id, "76543210-K");
        assert_eq!(header.issuer.legal_name, "ACME SPA");
        assert_eq!(header.issuer.business_activity, "Venta de materiales");
        assert_eq!(header.issuer.activity_codes, vec!["466301", "475201"]);
        assert_eq!(header.issuer.city, "Santiago");

        assert_eq!(header.receiver.tax_id, "77111222-3");
        assert_eq!(header.receiver.legal_name, "Constructora Andes Ltda");

        assert_eq!(header.totals.net_amount, dec!(8000));
        assert_eq!(header.totals.exempt_amount, Decimal::ZERO);
        assert_eq!(header.totals.tax_rate, dec!(19));
        assert_eq!(header.totals.tax_amount, dec!(1520));
        assert_eq!(header.totals.total_amount, dec!(9520));
    }

    #[test]
    fn extracts_line_items_in_order() {
        let doc = parse_document(PLAIN_DTE).unwrap();

        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0].line_number, 1);
        assert_eq!(doc.items[0].item_code, "CEM-25");
        assert_eq!(doc.items[0].item_code_type, "INT1");
        assert_eq!(doc.items[0].name, "Cemento 25kg");
        assert_eq!(doc.items[0].quantity, dec!(3));
        assert_eq!(doc.items[0].unit, "SACO");
        assert_eq!(doc.items[0].unit_price, dec!(1000));
        assert_eq!(doc.items[1].line_number, 2);
        assert_eq!(doc.items[1].unit_price, dec!(5000));
    }

    #[test]
    fn extracts_references() {
        let doc = parse_document(PLAIN_DTE).unwrap();

        assert_eq!(doc.references.len(), 1);
        let reference = &doc.references[0];
        assert_eq!(reference.line_number, 1);
        assert_eq!(reference.document_type, "801");
        assert_eq!(reference.folio, "OC-990");
        assert_eq!(reference.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(reference.reason_code, "");
        assert_eq!(reference.reason, "Orden de compra");
    }

    #[test]
    fn ignores_ted_subtree() {
        let doc = parse_document(PLAIN_DTE).unwrap();
        // The TED carries its own folio which must not leak into the header
        assert_eq!(doc.header.folio, "1234");
    }

    #[test]
    fn namespaced_document_extracts_identically() {
        let doc = parse_document(&namespaced_dte()).unwrap();
        assert_eq!(doc.header.folio, "1234");
        assert_eq!(doc.header.issuer.tax_id, "76543210-K");
        assert_eq!(doc.items.len(), 2);
    }

    #[test]
    fn line_numbers_default_to_discovery_order() {
        let xml = r#"<DTE><Documento><Encabezado><IdDoc><TipoDTE>33</TipoDTE></IdDoc></Encabezado>
            <Detalle><NmbItem>A</NmbItem></Detalle>
            <Detalle><NmbItem>B</NmbItem></Detalle>
        </Documento></DTE>"#;
        let doc = parse_document(xml).unwrap();
        assert_eq!(doc.items[0].line_number, 1);
        assert_eq!(doc.items[1].line_number, 2);
        assert_eq!(doc.items[0].quantity, Decimal::ONE);
        assert_eq!(doc.items[0].unit_price, Decimal::ZERO);
    }

    #[test]
    fn missing_tax_rate_defaults_to_statutory() {
        let xml = r#"<DTE><Documento><Encabezado>
            <IdDoc><TipoDTE>33</TipoDTE></IdDoc>
            <Totales><MntNeto>1000</MntNeto></Totales>
        </Encabezado></Documento></DTE>"#;
        let doc = parse_document(xml).unwrap();
        assert_eq!(doc.header.totals.tax_rate, dec!(19));
        assert_eq!(doc.header.totals.total_amount, Decimal::ZERO);
    }

    #[test]
    fn unparseable_dates_become_none() {
        let xml = r#"<DTE><Documento><Encabezado>
            <IdDoc><TipoDTE>33</TipoDTE><FchEmis>15/03/2024</FchEmis></IdDoc>
        </Encabezado></Documento></DTE>"#;
        let doc = parse_document(xml).unwrap();
        assert_eq!(doc.header.issue_date, None);
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let result = parse_document("<DTE><Documento><Encabezado></Documento></DTE>");
        assert!(matches!(result, Err(ServiceError::ParseError(_))));

        let unclosed = parse_document("<DTE><Documento><Encabezado>");
        assert!(matches!(unclosed, Err(ServiceError::ParseError(_))));
    }

    #[test]
    fn missing_documento_is_a_validation_error() {
        let result = parse_document("<DTE><Otro>x</Otro></DTE>");
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[test]
    fn missing_encabezado_is_a_validation_error() {
        let result = parse_document("<DTE><Documento><Detalle><NmbItem>A</NmbItem></Detalle></Documento></DTE>");
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[test]
    fn non_numeric_amount_is_a_validation_error() {
        let xml = r#"<DTE><Documento><Encabezado>
            <IdDoc><TipoDTE>33</TipoDTE></IdDoc>
            <Totales><MntNeto>abc</MntNeto></Totales>
        </Encabezado></Documento></DTE>"#;
        assert!(matches!(
            parse_document(xml),
            Err(ServiceError::ValidationError(_))
        ));
    }
}
