//! A query option parser reading each option as a JSON document of the parsed clause.
//!
//! `$filter` holds an expression, `$apply` an array of transformations, `$orderby` an array of
//! `{ "expression", "direction" }` links, `$select` and `$expand` arrays of strings and
//! `$top` / `$skip` non-negative integers. `$count` is accepted and left to the caller.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use odata_sql_models as models;
use query_engine_metadata::metadata::EntityModel;
use query_engine_translation::translation::parser::{
    recognize_options, ParseError, ParserFactory, QueryOption, QueryOptionParser,
    QueryParameters,
};

/// Builds a [`JsonParser`] per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParserFactory;

impl ParserFactory for JsonParserFactory {
    type Parser = JsonParser;

    fn create_parser(
        &self,
        entity: &EntityModel,
        parameters: &QueryParameters,
    ) -> Result<JsonParser, ParseError> {
        let options = recognize_options(parameters)?
            .into_iter()
            .map(|(option, value)| (option, value.to_string()))
            .collect();
        Ok(JsonParser {
            entity: entity.clone(),
            options,
        })
    }
}

/// The recognized query options of one request, parsed on demand.
#[derive(Debug, Clone)]
pub struct JsonParser {
    entity: EntityModel,
    options: BTreeMap<QueryOption, String>,
}

#[derive(Debug, Deserialize)]
struct OrderByLink {
    expression: models::Expression,
    #[serde(default)]
    direction: models::OrderByDirection,
}

impl JsonParser {
    fn parse_option<T: DeserializeOwned>(&self, option: QueryOption) -> Result<Option<T>, ParseError> {
        match self.options.get(&option) {
            None => Ok(None),
            Some(value) if value.trim().is_empty() => Ok(None),
            Some(value) => serde_json::from_str(value)
                .map(Some)
                .map_err(|error| ParseError::new(option, error.to_string())),
        }
    }

    fn parse_row_count(&self, option: QueryOption) -> Result<Option<u64>, ParseError> {
        match self.options.get(&option) {
            None => Ok(None),
            Some(value) => value.trim().parse().map(Some).map_err(|_| {
                ParseError::new(option, format!("expected a non-negative integer, got '{value}'"))
            }),
        }
    }

    fn parse_strings(&self, option: QueryOption) -> Result<Option<Vec<String>>, ParseError> {
        self.parse_option::<Vec<String>>(option)
    }

    /// Mark property references as declared or open according to the entity.
    fn classify(&self, expression: &mut models::Expression) {
        match expression {
            models::Expression::Property { name, kind } => {
                *kind = if self.entity.property_type(name).is_some() {
                    models::PropertyKind::Declared
                } else {
                    models::PropertyKind::Open
                };
            }
            models::Expression::Comparison { left, right, .. }
            | models::Expression::Logical { left, right, .. }
            | models::Expression::In { left, right } => {
                self.classify(left);
                self.classify(right);
            }
            models::Expression::Not { operand } => self.classify(operand),
            models::Expression::Convert { source, .. } => self.classify(source),
            models::Expression::FunctionCall { arguments, .. } => {
                arguments.iter_mut().for_each(|argument| self.classify(argument));
            }
            models::Expression::Collection { items } => {
                items.iter_mut().for_each(|item| self.classify(item));
            }
            models::Expression::Constant { .. } => {}
        }
    }

    fn classify_aggregate(&self, aggregate: &mut models::Aggregate) {
        for expression in &mut aggregate.expressions {
            if let Some(expression) = &mut expression.expression {
                self.classify(expression);
            }
        }
    }
}

impl QueryOptionParser for JsonParser {
    fn parse_filter(&self) -> Result<Option<models::Expression>, ParseError> {
        let mut filter = self.parse_option::<models::Expression>(QueryOption::Filter)?;
        if let Some(filter) = &mut filter {
            self.classify(filter);
        }
        Ok(filter)
    }

    fn parse_apply(&self) -> Result<Option<Vec<models::Transformation>>, ParseError> {
        let mut apply = self.parse_option::<Vec<models::Transformation>>(QueryOption::Apply)?;
        for stage in apply.iter_mut().flatten() {
            match stage {
                models::Transformation::Filter { expression } => self.classify(expression),
                models::Transformation::GroupBy {
                    grouping_properties,
                    aggregate,
                } => {
                    grouping_properties
                        .iter_mut()
                        .for_each(|property| self.classify(property));
                    if let Some(aggregate) = aggregate {
                        self.classify_aggregate(aggregate);
                    }
                }
                models::Transformation::Aggregate(aggregate) => self.classify_aggregate(aggregate),
                models::Transformation::Compute { expressions } => {
                    for compute in expressions {
                        self.classify(&mut compute.expression);
                    }
                }
                models::Transformation::Expand { .. } => {}
            }
        }
        Ok(apply.filter(|stages| !stages.is_empty()))
    }

    fn parse_order_by(&self) -> Result<Option<models::OrderByClause>, ParseError> {
        let links = self.parse_option::<Vec<OrderByLink>>(QueryOption::OrderBy)?;
        Ok(links.and_then(|links| {
            models::OrderByClause::chain(
                links
                    .into_iter()
                    .map(|mut link| {
                        self.classify(&mut link.expression);
                        (link.expression, link.direction)
                    })
                    .collect(),
            )
        }))
    }

    fn parse_top(&self) -> Result<Option<u64>, ParseError> {
        self.parse_row_count(QueryOption::Top)
    }

    fn parse_skip(&self) -> Result<Option<u64>, ParseError> {
        self.parse_row_count(QueryOption::Skip)
    }

    fn parse_select_and_expand(&self) -> Result<Option<models::SelectExpandClause>, ParseError> {
        let select = self.parse_strings(QueryOption::Select)?;
        let expand = self.parse_strings(QueryOption::Expand)?;
        if select.is_none() && expand.is_none() {
            return Ok(None);
        }

        let select = select.unwrap_or_default();
        let all_selected = select.is_empty() || select.iter().any(|path| path.trim() == "*");

        let mut items: Vec<models::SelectItem> = select
            .iter()
            .map(|path| path.trim())
            .filter(|path| !path.is_empty() && *path != "*")
            .map(|path| models::SelectItem::Path {
                segments: path.split('/').map(str::to_string).collect(),
            })
            .collect();

        // `Orders($select=Id)` expands only part of the navigation target
        items.extend(expand.unwrap_or_default().iter().map(|navigation| {
            match navigation.split_once('(') {
                Some((name, _)) => models::SelectItem::Expand {
                    navigation: name.trim().to_string(),
                    all_selected: false,
                },
                None => models::SelectItem::Expand {
                    navigation: navigation.trim().to_string(),
                    all_selected: true,
                },
            }
        }));

        Ok(Some(models::SelectExpandClause {
            all_selected,
            items,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(parameters: &[(&str, &str)]) -> JsonParser {
        let parameters = parameters
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        let mut entity = EntityModel::open("Products");
        entity.properties.insert(
            "Name".to_string(),
            query_engine_metadata::metadata::ScalarType::String,
        );
        JsonParserFactory.create_parser(&entity, &parameters).unwrap()
    }

    #[test]
    fn absent_options_parse_to_nothing() {
        let parser = parser(&[]);
        assert_eq!(parser.parse_filter(), Ok(None));
        assert_eq!(parser.parse_apply(), Ok(None));
        assert_eq!(parser.parse_order_by(), Ok(None));
        assert_eq!(parser.parse_top(), Ok(None));
        assert_eq!(parser.parse_select_and_expand(), Ok(None));
    }

    #[test]
    fn properties_are_classified_against_the_entity() {
        let parser = parser(&[(
            "$filter",
            r#"{ "type": "logical", "operator": "and",
                 "left": { "type": "property", "name": "Name" },
                 "right": { "type": "property", "name": "Colour" } }"#,
        )]);
        let Some(models::Expression::Logical { left, right, .. }) = parser.parse_filter().unwrap()
        else {
            panic!("expected a logical expression");
        };
        assert_eq!(
            *left,
            models::Expression::Property {
                name: "Name".to_string(),
                kind: models::PropertyKind::Declared
            }
        );
        assert_eq!(
            *right,
            models::Expression::Property {
                name: "Colour".to_string(),
                kind: models::PropertyKind::Open
            }
        );
    }

    #[test]
    fn order_by_links_are_chained() {
        let parser = parser(&[(
            "orderby",
            r#"[ { "expression": { "type": "property", "name": "Name" } },
                 { "expression": { "type": "property", "name": "Price" }, "direction": "desc" } ]"#,
        )]);
        let chain = parser.parse_order_by().unwrap().unwrap();
        let directions: Vec<_> = chain.iter().map(|link| link.direction).collect();
        assert_eq!(
            directions,
            vec![models::OrderByDirection::Asc, models::OrderByDirection::Desc]
        );
    }

    #[test]
    fn select_and_expand_are_combined() {
        let parser = parser(&[
            ("$select", r#"["Name", "Address/City"]"#),
            ("$expand", r#"["Category", "Supplier($select=Name)"]"#),
        ]);
        assert_eq!(
            parser.parse_select_and_expand(),
            Ok(Some(models::SelectExpandClause {
                all_selected: false,
                items: vec![
                    models::SelectItem::Path {
                        segments: vec!["Name".to_string()]
                    },
                    models::SelectItem::Path {
                        segments: vec!["Address".to_string(), "City".to_string()]
                    },
                    models::SelectItem::Expand {
                        navigation: "Category".to_string(),
                        all_selected: true
                    },
                    models::SelectItem::Expand {
                        navigation: "Supplier".to_string(),
                        all_selected: false
                    },
                ]
            }))
        );
    }

    #[test]
    fn a_lone_expand_selects_everything() {
        let parser = parser(&[("$expand", r#"["Category"]"#)]);
        assert!(parser.parse_select_and_expand().unwrap().unwrap().all_selected);
    }

    #[test]
    fn negative_row_counts_are_rejected() {
        let parser = parser(&[("$top", "-1")]);
        assert_eq!(
            parser.parse_top(),
            Err(ParseError::new(
                QueryOption::Top,
                "expected a non-negative integer, got '-1'"
            ))
        );
    }

    #[test]
    fn malformed_documents_name_the_option() {
        let parser = parser(&[("$apply", "[{")]);
        let error = parser.parse_apply().unwrap_err();
        assert_eq!(error.option, QueryOption::Apply);
    }
}
