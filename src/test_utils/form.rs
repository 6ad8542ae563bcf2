use scraper::{ElementRef, Html, Selector};

/// Get the form on the page, which must be the only one.
#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    let selector = Selector::parse("form").unwrap();
    let mut forms = html.select(&selector);

    let form = forms.next().expect("No form found");
    assert!(forms.next().is_none(), "want exactly one form on the page");

    form
}

#[track_caller]
pub(crate) fn assert_form_posts_to(form: &ElementRef<'_>, endpoint: &str) {
    assert_eq!(
        form.value().attr("hx-post"),
        Some(endpoint),
        "want form to post to {endpoint}"
    );
}

/// Assert that `form` has a required `<input>` called `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_required_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = form
        .select(&Selector::parse(&format!("input[name={name}]")).unwrap())
        .next()
        .unwrap_or_else(|| panic!("No input named \"{name}\""));

    assert_eq!(
        input.value().attr("type"),
        Some(type_),
        "want input \"{name}\" to have type \"{type_}\""
    );
    assert!(
        input.value().attr("required").is_some(),
        "want input \"{name}\" to be required"
    );
}

#[track_caller]
pub(crate) fn assert_submit_button(form: &ElementRef<'_>) {
    assert!(
        form.select(&Selector::parse("button[type=submit]").unwrap())
            .next()
            .is_some(),
        "No submit button found"
    );
}
