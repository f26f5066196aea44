mod form_props;
