use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr};

struct GridColumn {
    field: Ident,
    key: String,
    label: String,
    sortable: bool,
}

pub fn expand_grid_row(input: DeriveInput) -> TokenStream {
    let name = &input.ident;

    let Data::Struct(data) = &input.data else {
        return syn::Error::new_spanned(name, "GridRow can only be derived for structs")
            .to_compile_error();
    };
    let Fields::Named(fields) = &data.fields else {
        return syn::Error::new_spanned(name, "GridRow requires named fields").to_compile_error();
    };

    let id_field = match row_id_field(&input) {
        Ok(ident) => ident,
        Err(err) => return err,
    };
    if !fields.named.iter().any(|f| f.ident.as_ref() == Some(&id_field)) {
        return syn::Error::new_spanned(&id_field, "grid(id) names a field that does not exist")
            .to_compile_error();
    }

    let mut columns = Vec::new();
    for field in &fields.named {
        let Some(ident) = &field.ident else { continue };
        match parse_column(ident, &field.attrs) {
            Ok(Some(column)) => columns.push(column),
            Ok(None) => {},
            Err(err) => return err,
        }
    }

    if columns.is_empty() {
        return syn::Error::new_spanned(name, "GridRow needs at least one #[grid(label = ...)] field")
            .to_compile_error();
    }

    let descriptors = columns.iter().map(|c| {
        let (key, label, sortable) = (&c.key, &c.label, c.sortable);
        quote! { ::ctn_domain::grid::Column { key: #key, label: #label, sortable: #sortable } }
    });
    let arms = columns.iter().map(|c| {
        let (key, field) = (&c.key, &c.field);
        quote! { #key => Some(::ctn_domain::grid::GridCell::cell_text(&self.#field)), }
    });

    quote! {
        #[automatically_derived]
        impl ::ctn_domain::grid::GridRow for #name {
            fn columns() -> &'static [::ctn_domain::grid::Column] {
                const COLUMNS: &[::ctn_domain::grid::Column] = &[#(#descriptors),*];
                COLUMNS
            }

            fn row_id(&self) -> String {
                ::ctn_domain::grid::GridCell::cell_text(&self.#id_field)
            }

            fn cell(&self, key: &str) -> Option<String> {
                match key {
                    #(#arms)*
                    _ => None,
                }
            }
        }
    }
}

fn row_id_field(input: &DeriveInput) -> Result<Ident, TokenStream> {
    let mut id = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("grid")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                let lit: LitStr = meta.value()?.parse()?;
                id = Some(Ident::new(&lit.value(), lit.span()));
                Ok(())
            } else {
                Err(meta.error("unsupported container attribute; expected `id = \"field\"`"))
            }
        })
        .map_err(|err| err.to_compile_error())?;
    }

    id.ok_or_else(|| {
        syn::Error::new_spanned(&input.ident, "GridRow requires #[grid(id = \"field\")]")
            .to_compile_error()
    })
}

fn parse_column(ident: &Ident, attrs: &[syn::Attribute]) -> Result<Option<GridColumn>, TokenStream> {
    let mut column: Option<GridColumn> = None;

    for attr in attrs.iter().filter(|a| a.path().is_ident("grid")) {
        let col = column.get_or_insert_with(|| GridColumn {
            field: ident.clone(),
            key: camel_case(&ident.to_string()),
            label: String::new(),
            sortable: false,
        });

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("label") {
                col.label = meta.value()?.parse::<LitStr>()?.value();
            } else if meta.path.is_ident("key") {
                col.key = meta.value()?.parse::<LitStr>()?.value();
            } else if meta.path.is_ident("sortable") {
                col.sortable = true;
            } else {
                return Err(meta.error("unsupported grid attribute; expected label, key or sortable"));
            }
            Ok(())
        })
        .map_err(|err| err.to_compile_error())?;
    }

    if let Some(col) = &column
        && col.label.is_empty()
    {
        return Err(syn::Error::new_spanned(ident, "grid column requires `label = \"...\"`")
            .to_compile_error());
    }

    Ok(column)
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::camel_case;

    #[test]
    fn camel_case_converts_snake_fields() {
        assert_eq!(camel_case("legal_name"), "legalName");
        assert_eq!(camel_case("org_id"), "orgId");
        assert_eq!(camel_case("status"), "status");
    }
}
