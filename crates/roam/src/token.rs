//! Authorization tokens (RFID cards, app users, ...).

use roam_core::meta::{non_empty, require};
use roam_core::{FieldReader, FieldWriter, Meta, MetaBuilder, ParseError, Resource, ResourceBuilder, Warnings};
use serde::{Deserialize, Serialize};

use crate::common::TokenType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WhitelistType {
    Always,
    Allowed,
    AllowedOffline,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnergyContract {
    pub supplier_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
}

const TYPE: &str = "type";
const CONTRACT_ID: &str = "contract_id";
const VISUAL_NUMBER: &str = "visual_number";
const ISSUER: &str = "issuer";
const GROUP_ID: &str = "group_id";
const VALID: &str = "valid";
const WHITELIST: &str = "whitelist";
const LANGUAGE: &str = "language";
const ENERGY_CONTRACT: &str = "energy_contract";

#[derive(Debug, Clone)]
pub struct Token {
    meta: Meta,
    token_type: TokenType,
    contract_id: String,
    visual_number: Option<String>,
    issuer: String,
    group_id: Option<String>,
    valid: bool,
    whitelist: WhitelistType,
    language: Option<String>,
    energy_contract: Option<EnergyContract>,
}

impl Token {
    pub fn builder() -> TokenBuilder {
        TokenBuilder::default()
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    pub fn visual_number(&self) -> Option<&str> {
        self.visual_number.as_deref()
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn whitelist(&self) -> WhitelistType {
        self.whitelist
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn energy_contract(&self) -> Option<&EnergyContract> {
        self.energy_contract.as_ref()
    }
}

impl Resource for Token {
    type Builder = TokenBuilder;

    const KIND: &'static str = "token";
    const PROTECTED_FIELDS: &'static [&'static str] = &[TYPE];

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn write_fields(&self, out: &mut FieldWriter<'_>) {
        out.put(TYPE, &self.token_type);
        out.put_str(CONTRACT_ID, &self.contract_id);
        out.put_opt_str(VISUAL_NUMBER, self.visual_number.as_deref());
        out.put_str(ISSUER, &self.issuer);
        out.put_opt_str(GROUP_ID, self.group_id.as_deref());
        out.put(VALID, &self.valid);
        out.put(WHITELIST, &self.whitelist);
        out.put_opt_str(LANGUAGE, self.language.as_deref());
        out.put_opt(ENERGY_CONTRACT, self.energy_contract.as_ref());
    }

    fn read_fields(builder: &mut TokenBuilder, fields: &mut FieldReader<'_>) -> Result<(), ParseError> {
        builder.token_type = fields.value(TYPE)?;
        builder.contract_id = fields.string(CONTRACT_ID)?;
        builder.visual_number = fields.string(VISUAL_NUMBER)?;
        builder.issuer = fields.string(ISSUER)?;
        builder.group_id = fields.string(GROUP_ID)?;
        builder.valid = fields.bool(VALID)?;
        builder.whitelist = fields.value(WHITELIST)?;
        builder.language = fields.string(LANGUAGE)?;
        builder.energy_contract = fields.value(ENERGY_CONTRACT)?;
        Ok(())
    }

    fn to_builder(&self) -> TokenBuilder {
        TokenBuilder {
            meta: MetaBuilder::from_meta(&self.meta),
            token_type: Some(self.token_type),
            contract_id: Some(self.contract_id.clone()),
            visual_number: self.visual_number.clone(),
            issuer: Some(self.issuer.clone()),
            group_id: self.group_id.clone(),
            valid: Some(self.valid),
            whitelist: Some(self.whitelist),
            language: self.language.clone(),
            energy_contract: self.energy_contract.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenBuilder {
    meta: MetaBuilder,
    token_type: Option<TokenType>,
    contract_id: Option<String>,
    visual_number: Option<String>,
    issuer: Option<String>,
    group_id: Option<String>,
    valid: Option<bool>,
    whitelist: Option<WhitelistType>,
    language: Option<String>,
    energy_contract: Option<EnergyContract>,
}

impl TokenBuilder {
    pub fn token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = Some(token_type);
        self
    }

    pub fn contract_id(mut self, contract_id: impl Into<String>) -> Self {
        self.contract_id = Some(contract_id.into());
        self
    }

    pub fn visual_number(mut self, visual_number: impl Into<String>) -> Self {
        self.visual_number = Some(visual_number.into());
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn valid(mut self, valid: bool) -> Self {
        self.valid = Some(valid);
        self
    }

    pub fn whitelist(mut self, whitelist: WhitelistType) -> Self {
        self.whitelist = Some(whitelist);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn energy_contract(mut self, contract: EnergyContract) -> Self {
        self.energy_contract = Some(contract);
        self
    }
}

impl ResourceBuilder for TokenBuilder {
    type Resource = Token;

    fn meta_mut(&mut self) -> &mut MetaBuilder {
        &mut self.meta
    }

    fn finish(self, warnings: &mut Warnings) -> Option<Token> {
        let before = warnings.len();
        let meta = self.meta.finish(warnings);
        let token_type = require(self.token_type, "type must be set", warnings);
        let contract_id = non_empty(self.contract_id, "contract_id must not be empty", warnings);
        let issuer = non_empty(self.issuer, "issuer must not be empty", warnings);
        let valid = require(self.valid, "valid must be set", warnings);
        let whitelist = require(self.whitelist, "whitelist must be set", warnings);

        if let Some(language) = &self.language {
            if language.chars().count() != 2 {
                warnings.push(format!("language '{language}' must be a 2-letter ISO 639-1 code"));
            }
        }
        if let Some(contract) = &self.energy_contract {
            if contract.supplier_name.trim().is_empty() {
                warnings.push("energy_contract.supplier_name must not be empty");
            }
        }

        if warnings.len() > before {
            return None;
        }
        Some(Token {
            meta: meta?,
            token_type: token_type?,
            contract_id: contract_id?,
            visual_number: self.visual_number,
            issuer: issuer?,
            group_id: self.group_id,
            valid: valid?,
            whitelist: whitelist?,
            language: self.language,
            energy_contract: self.energy_contract,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roam_core::{PartyId, UrlIdentity};
    use serde_json::json;

    #[test]
    fn parses_wire_document() {
        let doc = json!({
            "country_code": "DE",
            "party_id": "TNM",
            "id": "012345678",
            "type": "RFID",
            "contract_id": "DE8ACC12E46L89",
            "issuer": "TheNewMotion",
            "valid": true,
            "whitelist": "ALLOWED",
            "language": "nl",
            "last_updated": "2024-02-27T15:56:46Z"
        });
        let token = Token::try_parse(&doc, &UrlIdentity::none()).unwrap();
        assert_eq!(token.token_type(), TokenType::Rfid);
        assert_eq!(token.whitelist(), WhitelistType::Allowed);
        assert!(token.is_valid());
        assert_eq!(token.to_canonical()["whitelist"], json!("ALLOWED"));
    }

    #[test]
    fn valid_must_be_a_boolean() {
        let doc = json!({
            "country_code": "DE", "party_id": "TNM", "id": "T1",
            "type": "RFID", "contract_id": "C1", "issuer": "I", "valid": "yes", "whitelist": "NEVER"
        });
        let err = Token::try_parse(&doc, &UrlIdentity::none()).unwrap_err();
        assert_eq!(err.message(), "valid must be a boolean, got a string");
    }

    #[test]
    fn missing_mandatory_fields_are_all_reported() {
        let (snapshot, warnings) = Token::builder().party(PartyId::new("DE", "TNM")).id("T1").to_immutable();
        assert!(snapshot.is_none());
        assert_eq!(
            warnings.into_vec(),
            [
                "type must be set",
                "contract_id must not be empty",
                "issuer must not be empty",
                "valid must be set",
                "whitelist must be set",
            ]
        );
    }
}
