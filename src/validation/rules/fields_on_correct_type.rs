use crate::{
    ast::Field,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub struct FieldsOnCorrectType;

pub fn factory() -> FieldsOnCorrectType {
    FieldsOnCorrectType
}

impl<'a> Visitor<'a> for FieldsOnCorrectType {
    fn enter_field(&mut self, context: &mut ValidatorContext<'a>, field: &'a Spanning<Field<'a>>) {
        if let Some(parent_type) = context.parent_type() {
            let field_name = &field.item.name;

            // `__typename` is answered by every composite type, unions included.
            if field_name.item == "__typename" && parent_type.is_composite() {
                return;
            }

            if parent_type.field_by_name(field_name.item).is_none() {
                context.report_error(
                    &error_message(field_name.item, parent_type.name()),
                    &[field_name.start()],
                );
            }
        }
    }
}

fn error_message(field: &str, type_name: &str) -> String {
    format!(r#"Unknown field "{field}" on type "{type_name}""#)
}
