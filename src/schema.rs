table! {
    category (id) {
        id -> Integer,
        name -> Varchar,
        alternative -> Bool,
    }
}

table! {
    product (id) {
        id -> Integer,
        name -> Varchar,
        image -> Varchar,
        url -> Varchar,
        nutriscore -> Nullable<Varchar>,
        energy -> Nullable<Float>,
        fat -> Nullable<Float>,
        saturated_fat -> Nullable<Float>,
        sugars -> Nullable<Float>,
        salt -> Nullable<Float>,
        category_id -> Integer,
    }
}

table! {
    favourite_product (id) {
        id -> Integer,
        user_id -> Integer,
        product_id -> Integer,
    }
}

joinable!(product -> category (category_id));
joinable!(favourite_product -> product (product_id));

allow_tables_to_appear_in_same_query!(category, product, favourite_product);
