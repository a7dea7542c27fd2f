mod compatibility_properties;
