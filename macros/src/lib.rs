use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn};

/// Test attribute for rxlite.
///
/// Sync functions become plain `#[test]`s. Async functions run on a
/// current-thread tokio runtime; with `#[rxlite_macro::test(local)]` the body
/// additionally runs inside a `tokio::task::LocalSet`, which is what
/// `spawn_local` based schedulers need.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);
  let is_async = input.sig.asyncness.is_some();
  let raw_args = proc_macro2::TokenStream::from(attr);

  let local = if raw_args.is_empty() {
    false
  } else {
    if !is_async {
      return TokenStream::from(
        syn::Error::new(
          raw_args.span(),
          "rxlite_macro::test args are only supported for async tests",
        )
        .to_compile_error(),
      );
    }
    match syn::parse2::<Ident>(raw_args.clone()) {
      Ok(ident) if ident == "local" => true,
      _ => {
        return TokenStream::from(
          syn::Error::new(
            raw_args.span(),
            "rxlite_macro::test only accepts: #[rxlite_macro::test] or \
             #[rxlite_macro::test(local)]",
          )
          .to_compile_error(),
        );
      }
    }
  };

  if !is_async {
    return TokenStream::from(quote! {
      #[test]
      #input
    });
  }

  if !local {
    return TokenStream::from(quote! {
      #[::tokio::test(flavor = "current_thread")]
      #input
    });
  }

  let ItemFn { attrs, vis, sig, block } = input;
  TokenStream::from(quote! {
    #[::tokio::test(flavor = "current_thread")]
    #(#attrs)*
    #vis #sig {
      ::tokio::task::LocalSet::new().run_until(async move #block).await
    }
  })
}
